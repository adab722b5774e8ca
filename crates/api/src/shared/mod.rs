pub mod auth;
#[cfg(test)]
pub mod unreachable_repos;
pub mod usecase;
