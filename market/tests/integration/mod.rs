mod actions;
mod environment;
mod error_cases;
mod headless;
mod memoization;
