pub mod token_issuer;
