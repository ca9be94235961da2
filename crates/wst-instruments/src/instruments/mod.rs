pub mod wst;
