//! Line tokenizing for delimited text

mod tokenizer;

pub use tokenizer::Tokenizer;
