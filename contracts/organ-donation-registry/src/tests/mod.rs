pub mod utils;

mod matching;
