// Console helpers for CLI commands

/// Print success message
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Explorer link for an address on a public cluster
pub fn explorer_address_url(address: &str, cluster: &str) -> String {
    format!("https://explorer.solana.com/address/{}?cluster={}", address, cluster)
}

/// Explorer link for a transaction on a public cluster
pub fn explorer_tx_url(signature: &str, cluster: &str) -> String {
    format!("https://explorer.solana.com/tx/{}?cluster={}", signature, cluster)
}
