mod helpers;
mod test_drafts;
mod test_reference;
mod test_upload;
