/// Coinbase Exchange (formerly GDAX) ticker channel codec.
pub mod coinbase;
