//! Mock crypto wallet and NFT marketplace
//!
//! Pure record keeping: fake balances, a fixed exchange-rate table and a
//! single-player NFT market. Nothing here touches a real chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of trade records kept
pub const MAX_TRADE_HISTORY: usize = 50;

/// Seller name used for the player's own listings
pub const PLAYER: &str = "You";

/// Mock tokens held in the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    Eth,
    Sol,
    Btc,
    Usdc,
}

impl Token {
    pub const ALL: [Token; 4] = [Token::Eth, Token::Sol, Token::Btc, Token::Usdc];

    pub fn symbol(self) -> &'static str {
        match self {
            Token::Eth => "ETH",
            Token::Sol => "SOL",
            Token::Btc => "BTC",
            Token::Usdc => "USDC",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        Token::ALL
            .into_iter()
            .find(|t| t.symbol().eq_ignore_ascii_case(s.trim()))
    }

    /// Balance a fresh wallet starts with
    pub fn starting_balance(self) -> f64 {
        match self {
            Token::Eth => 2.5,
            Token::Sol => 15.8,
            Token::Btc => 0.1,
            Token::Usdc => 1000.0,
        }
    }
}

/// Fixed demo exchange rate; unlisted pairs convert 1:1
pub fn exchange_rate(from: Token, to: Token) -> f64 {
    use Token::*;
    match (from, to) {
        (Eth, Sol) => 8.5,
        (Sol, Eth) => 0.12,
        (Eth, Btc) => 0.065,
        (Btc, Eth) => 15.4,
        (Eth, Usdc) => 2500.0,
        (Usdc, Eth) => 0.0004,
        (Sol, Usdc) => 140.0,
        (Usdc, Sol) => 0.007,
        (Btc, Usdc) => 42000.0,
        (Usdc, Btc) => 0.000024,
        _ => 1.0,
    }
}

/// A collectible type sold by the market
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NftType {
    pub id: u32,
    pub name: &'static str,
    pub image: &'static str,
    pub rarity: &'static str,
    /// Price in ETH
    pub base_price: f64,
}

/// Every market NFT lists at this many ETH
pub const NFT_BASE_PRICE: f64 = 1.0;

const fn nft(id: u32, name: &'static str, image: &'static str, rarity: &'static str) -> NftType {
    NftType {
        id,
        name,
        image,
        rarity,
        base_price: NFT_BASE_PRICE,
    }
}

pub const NFT_TYPES: [NftType; 8] = [
    nft(1, "Legendary Shrimp", "/publics/skins/NFT1.png", "Legendary"),
    nft(2, "Golden Wave", "/publics/skins/NFT2.png", "Epic"),
    nft(3, "Ocean Master", "/publics/skins/NFT3.png", "Rare"),
    nft(4, "Deep Sea Explorer", "/publics/skins/NFT4.png", "Uncommon"),
    nft(5, "Coral Guardian", "/publics/skins/NFT5.png", "Common"),
    nft(6, "Tide Walker", "/publics/skins/NFT6.png", "Common"),
    nft(7, "Wave Rider", "/publics/skins/NFT7.png", "Uncommon"),
    nft(8, "Sea Dragon", "/publics/skins/NFT8.png", "Epic"),
];

/// An NFT owned by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedNft {
    pub id: u64,
    pub type_id: u32,
    pub name: String,
    pub image: String,
    pub rarity: String,
    pub purchase_price: f64,
    /// Milliseconds since the Unix epoch
    pub purchased_at: f64,
}

/// An NFT up for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub nft_id: u64,
    pub type_id: u32,
    pub name: String,
    pub image: String,
    pub rarity: String,
    pub price: f64,
    pub seller: String,
    pub listed_at: f64,
}

/// A completed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub nft_name: String,
    pub price: f64,
    pub buyer: String,
    pub seller: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    #[error("Insufficient {} balance!", .0.symbol())]
    InsufficientBalance(Token),
    #[error("Please enter a valid address!")]
    InvalidAddress,
    #[error("Amount must be greater than zero")]
    InvalidAmount,
    #[error("Invalid NFT or price!")]
    InvalidPrice,
    #[error("No such NFT")]
    UnknownNft,
    #[error("Listing not found")]
    ListingNotFound,
    #[error("Only the seller can cancel a listing")]
    NotSeller,
}

/// Wallet balances plus the player's NFT holdings and market state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoWallet {
    pub eth: f64,
    pub sol: f64,
    pub btc: f64,
    pub usdc: f64,
    pub nfts: Vec<OwnedNft>,
    pub listings: Vec<Listing>,
    /// Newest first
    pub history: Vec<Trade>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for CryptoWallet {
    fn default() -> Self {
        Self {
            eth: Token::Eth.starting_balance(),
            sol: Token::Sol.starting_balance(),
            btc: Token::Btc.starting_balance(),
            usdc: Token::Usdc.starting_balance(),
            nfts: Vec::new(),
            listings: Vec::new(),
            history: Vec::new(),
            next_id: 1,
        }
    }
}

impl CryptoWallet {
    /// Continue id allocation after `seed` (use the load-time clock so ids
    /// never collide with persisted records)
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        let highest = self
            .nfts
            .iter()
            .map(|n| n.id)
            .chain(self.listings.iter().map(|l| l.id))
            .chain(self.history.iter().map(|t| t.id))
            .max()
            .unwrap_or(0);
        self.next_id = seed.max(highest + 1).max(1);
        self
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn balance(&self, token: Token) -> f64 {
        match token {
            Token::Eth => self.eth,
            Token::Sol => self.sol,
            Token::Btc => self.btc,
            Token::Usdc => self.usdc,
        }
    }

    fn balance_mut(&mut self, token: Token) -> &mut f64 {
        match token {
            Token::Eth => &mut self.eth,
            Token::Sol => &mut self.sol,
            Token::Btc => &mut self.btc,
            Token::Usdc => &mut self.usdc,
        }
    }

    fn require(&self, token: Token, amount: f64) -> Result<(), WalletError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }
        if self.balance(token) < amount {
            return Err(WalletError::InsufficientBalance(token));
        }
        Ok(())
    }

    /// Swap `amount` of `from` into `to` at the fixed rate. Returns the amount received.
    pub fn swap(&mut self, from: Token, to: Token, amount: f64) -> Result<f64, WalletError> {
        self.require(from, amount)?;
        let received = amount * exchange_rate(from, to);
        *self.balance_mut(from) -= amount;
        *self.balance_mut(to) += received;
        log::info!(
            "Swapped {} {} for {:.4} {}",
            amount,
            from.symbol(),
            received,
            to.symbol()
        );
        Ok(received)
    }

    /// Send tokens to an address (debit only; the address is not checked beyond non-empty)
    pub fn send(&mut self, token: Token, amount: f64, address: &str) -> Result<(), WalletError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(WalletError::InvalidAddress);
        }
        self.require(token, amount)?;
        *self.balance_mut(token) -= amount;
        log::info!("Sent {} {} to {}", amount, token.symbol(), address);
        Ok(())
    }

    fn record_trade(&mut self, nft_name: &str, price: f64, seller: &str, now_ms: f64) {
        let trade = Trade {
            id: self.next_id(),
            nft_name: nft_name.to_string(),
            price,
            buyer: PLAYER.to_string(),
            seller: seller.to_string(),
            timestamp: now_ms,
        };
        self.history.insert(0, trade);
        self.history.truncate(MAX_TRADE_HISTORY);
    }

    /// Buy a fresh NFT of `type_id` from the market for its base price
    pub fn buy_from_market(&mut self, type_id: u32, now_ms: f64) -> Result<u64, WalletError> {
        let nft_type = NFT_TYPES
            .iter()
            .find(|t| t.id == type_id)
            .ok_or(WalletError::UnknownNft)?;
        self.require(Token::Eth, nft_type.base_price)?;

        self.eth -= nft_type.base_price;
        let id = self.next_id();
        self.nfts.push(OwnedNft {
            id,
            type_id: nft_type.id,
            name: nft_type.name.to_string(),
            image: nft_type.image.to_string(),
            rarity: nft_type.rarity.to_string(),
            purchase_price: nft_type.base_price,
            purchased_at: now_ms,
        });
        self.record_trade(nft_type.name, nft_type.base_price, "Market", now_ms);
        log::info!("Bought {} for {} ETH", nft_type.name, nft_type.base_price);
        Ok(id)
    }

    /// Move an owned NFT to the market at `price` ETH
    pub fn list_for_sale(
        &mut self,
        nft_id: u64,
        price: f64,
        now_ms: f64,
    ) -> Result<u64, WalletError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(WalletError::InvalidPrice);
        }
        let idx = self
            .nfts
            .iter()
            .position(|n| n.id == nft_id)
            .ok_or(WalletError::InvalidPrice)?;

        let nft = self.nfts.remove(idx);
        let id = self.next_id();
        log::info!("Listed {} for {} ETH", nft.name, price);
        self.listings.push(Listing {
            id,
            nft_id: nft.id,
            type_id: nft.type_id,
            name: nft.name,
            image: nft.image,
            rarity: nft.rarity,
            price,
            seller: PLAYER.to_string(),
            listed_at: now_ms,
        });
        Ok(id)
    }

    /// Buy a listed NFT
    pub fn buy_listing(&mut self, listing_id: u64, now_ms: f64) -> Result<u64, WalletError> {
        let idx = self
            .listings
            .iter()
            .position(|l| l.id == listing_id)
            .ok_or(WalletError::ListingNotFound)?;
        self.require(Token::Eth, self.listings[idx].price)?;

        let listing = self.listings.remove(idx);
        self.eth -= listing.price;
        let id = self.next_id();
        self.nfts.push(OwnedNft {
            id,
            type_id: listing.type_id,
            name: listing.name.clone(),
            image: listing.image,
            rarity: listing.rarity,
            purchase_price: listing.price,
            purchased_at: now_ms,
        });
        self.record_trade(&listing.name, listing.price, &listing.seller, now_ms);
        log::info!("Bought listing {} ({}) for {} ETH", listing_id, listing.name, listing.price);
        Ok(id)
    }

    /// Withdraw the player's own listing; the NFT comes back at purchase price 0
    pub fn cancel_listing(&mut self, listing_id: u64, now_ms: f64) -> Result<u64, WalletError> {
        let idx = self
            .listings
            .iter()
            .position(|l| l.id == listing_id)
            .ok_or(WalletError::ListingNotFound)?;
        if self.listings[idx].seller != PLAYER {
            return Err(WalletError::NotSeller);
        }

        let listing = self.listings.remove(idx);
        let id = self.next_id();
        log::info!("Listing {} cancelled, {} returned", listing_id, listing.name);
        self.nfts.push(OwnedNft {
            id,
            type_id: listing.type_id,
            name: listing.name,
            image: listing.image,
            rarity: listing.rarity,
            purchase_price: 0.0,
            purchased_at: now_ms,
        });
        Ok(id)
    }
}
