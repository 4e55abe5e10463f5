pub mod account_resolver;
