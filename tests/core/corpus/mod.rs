pub mod test_reader;
