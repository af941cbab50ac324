pub mod http;

#[cfg(test)]
pub mod capture;
