mod catalog;
mod fake;
mod session;
