pub mod command;
pub mod paths;
#[cfg(test)]
pub(crate) mod testing;
