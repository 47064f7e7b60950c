mod records;
mod redacted_secret;
