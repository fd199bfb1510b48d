//! Stores an int, a string and a struct key side by side, reads two of them
//! back and removes one.
//!
//! `RUST_LOG=trace cargo run --example basic` also shows the map's logs.

use chain_hashmap::{ChainMap, Result};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy)]
struct Point {
    x: i32,
    y: i32,
}

impl Point {
    fn to_ne_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.x.to_ne_bytes());
        out[4..].copy_from_slice(&self.y.to_ne_bytes());
        out
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut map = ChainMap::new();

    let key_int = 42i32;
    #[allow(clippy::approx_constant)]
    let val_double = 3.14159f64;
    map.insert(&key_int.to_ne_bytes(), &val_double.to_ne_bytes())?;

    let key_str = "hello\0";
    map.insert(key_str.as_bytes(), b"world\0")?;

    let point = Point { x: 10, y: 20 };
    map.insert(&point.to_ne_bytes(), b"a point\0")?;

    if let Some(bytes) = map.get(&key_int.to_ne_bytes())? {
        if let Ok(raw) = <[u8; 8]>::try_from(bytes.as_slice()) {
            println!(
                "Retrieved value for key {key_int} is {:.6}",
                f64::from_ne_bytes(raw)
            );
        }
    }

    if let Some(bytes) = map.get(key_str.as_bytes())? {
        let text = String::from_utf8_lossy(&bytes);
        println!(
            "Retrieved value for key \"{}\" is \"{}\"",
            key_str.trim_end_matches('\0'),
            text.trim_end_matches('\0')
        );
    }

    let removed = map.remove(&key_int.to_ne_bytes())?;
    println!("Removed key {key_int}: {removed}");

    map.destroy();
    Ok(())
}
