pub mod chain_reader;
