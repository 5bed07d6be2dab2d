//! # Block Explorer Links
//!
//! URL builders for the four supported block explorers. Links carry a
//! `?cluster=` parameter whenever the cluster is not mainnet-beta.

use crate::client::Cluster;
use serde::{Deserialize, Serialize};

/// Supported block explorers. Serialized by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Explorer {
    #[default]
    #[serde(rename = "Solana Explorer")]
    SolanaExplorer,
    #[serde(rename = "Solscan")]
    Solscan,
    #[serde(rename = "Solana Beach")]
    SolanaBeach,
    #[serde(rename = "Solana FM")]
    SolanaFm,
}

struct ExplorerPaths {
    tx: &'static str,
    account: &'static str,
    token: &'static str,
}

impl Explorer {
    pub fn all() -> [Explorer; 4] {
        [
            Explorer::SolanaExplorer,
            Explorer::Solscan,
            Explorer::SolanaBeach,
            Explorer::SolanaFm,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Explorer::SolanaExplorer => "Solana Explorer",
            Explorer::Solscan => "Solscan",
            Explorer::SolanaBeach => "Solana Beach",
            Explorer::SolanaFm => "Solana FM",
        }
    }

    fn paths(&self) -> ExplorerPaths {
        match self {
            Explorer::SolanaExplorer => ExplorerPaths {
                tx: "https://explorer.solana.com/tx/",
                account: "https://explorer.solana.com/address/",
                token: "https://explorer.solana.com/address/",
            },
            Explorer::Solscan => ExplorerPaths {
                tx: "https://solscan.io/tx/",
                account: "https://solscan.io/account/",
                token: "https://solscan.io/token/",
            },
            Explorer::SolanaBeach => ExplorerPaths {
                tx: "https://solanabeach.io/transaction/",
                account: "https://solanabeach.io/address/",
                token: "https://solanabeach.io/token/",
            },
            Explorer::SolanaFm => ExplorerPaths {
                tx: "https://solana.fm/tx/",
                account: "https://solana.fm/address/",
                token: "https://solana.fm/address/",
            },
        }
    }

    pub fn tx_url(&self, signature: &str, cluster: Cluster) -> String {
        with_cluster(format!("{}{}", self.paths().tx, signature), cluster)
    }

    pub fn account_url(&self, address: &str, cluster: Cluster) -> String {
        with_cluster(format!("{}{}", self.paths().account, address), cluster)
    }

    pub fn token_url(&self, mint: &str, cluster: Cluster) -> String {
        with_cluster(format!("{}{}", self.paths().token, mint), cluster)
    }
}

fn with_cluster(url: String, cluster: Cluster) -> String {
    if cluster.is_mainnet() {
        url
    } else {
        format!("{}?cluster={}", url, cluster.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_links_have_no_cluster_param() {
        assert_eq!(
            Explorer::SolanaExplorer.tx_url("abc", Cluster::MainnetBeta),
            "https://explorer.solana.com/tx/abc"
        );
        assert_eq!(
            Explorer::Solscan.account_url("addr", Cluster::MainnetBeta),
            "https://solscan.io/account/addr"
        );
    }

    #[test]
    fn test_devnet_links_carry_cluster() {
        assert_eq!(
            Explorer::SolanaBeach.token_url("mint", Cluster::Devnet),
            "https://solanabeach.io/token/mint?cluster=devnet"
        );
        assert_eq!(
            Explorer::SolanaFm.token_url("mint", Cluster::Devnet),
            "https://solana.fm/address/mint?cluster=devnet"
        );
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Explorer::SolanaFm).unwrap();
        assert_eq!(json, "\"Solana FM\"");
        let parsed: Explorer = serde_json::from_str("\"Solana Explorer\"").unwrap();
        assert_eq!(parsed, Explorer::SolanaExplorer);
    }
}
