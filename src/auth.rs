// ABOUTME: JWT bearer-token validation for the portal's authenticated endpoints
// ABOUTME: Session issuance is external; this is only the boundary check and claims extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainer Portal

//! Authentication plumbing at the interface boundary.
//!
//! The portal validates HS256 bearer tokens and extracts the caller's
//! identity. Login and token issuance belong to the surrounding system;
//! [`AuthManager::generate_token`] exists for that system's tooling and for
//! tests.

use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried in a portal bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email address, if the account has one
    pub email: Option<String>,
    /// Admin flag
    pub is_admin: bool,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Authenticated caller identity, extracted from validated claims
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// User ID
    pub user_id: Uuid,
    /// Email address from the token, if any
    pub email: Option<String>,
    /// Whether the caller is an admin
    pub is_admin: bool,
}

/// Token validation (and test/tooling issuance) manager
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a manager from the shared HS256 secret
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    /// Issue a token for `user` valid for the configured expiry
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn generate_token(&self, user: &User, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Validate a raw token and extract the caller identity
    ///
    /// # Errors
    ///
    /// Returns an auth error if the token is expired, malformed, or carries
    /// an invalid user ID
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AppError::auth_invalid(format!("Token validation failed: {e}")))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AppError::auth_invalid(format!("Invalid subject claim: {e}")))?;

        Ok(AuthResult {
            user_id,
            email: data.claims.email,
            is_admin: data.claims.is_admin,
        })
    }

    /// Authenticate an `Authorization` header value (`Bearer <token>`)
    ///
    /// # Errors
    ///
    /// Returns an auth error if the header is missing, not a bearer scheme,
    /// or the token fails validation
    pub fn authenticate_header(&self, header: Option<&str>) -> AppResult<AuthResult> {
        let header = header.ok_or_else(AppError::auth_required)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Expected bearer authorization"))?;
        self.validate_token(token)
    }
}
