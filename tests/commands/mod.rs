mod test_upload;
