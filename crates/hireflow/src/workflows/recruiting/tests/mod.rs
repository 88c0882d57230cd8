mod common;

mod applications;
mod postings;
mod scoring;
mod store;
