pub mod errors;
pub mod db;
pub mod feature;
pub mod vote;

#[cfg(test)]
mod tests;
