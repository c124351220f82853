use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the bearer token issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,  // User ID
    pub iat: usize, // Issued at
    pub exp: usize, // Expiration
}
