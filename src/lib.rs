pub mod demo;
pub mod model;
pub mod process;
pub mod sim;

#[cfg(test)]
mod test;
