pub mod config;
pub mod draft;
pub mod match_list;
pub mod match_parse;
pub mod odds;
pub mod payload;
pub mod state;
pub mod submit;
