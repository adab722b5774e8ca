use super::Policy;
use crate::error::AutogiftError;
use actix_web::HttpRequest;
use autogift_domain::{is_valid_email, User, ID};
use autogift_infra::AutogiftContext;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Claims of the user tokens issued by the hosted auth
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// The user id
    pub sub: String,
    pub email: String,
    pub gifting_policy: Option<Policy>,
}

fn parse_authtoken_header(token_header_value: &str) -> String {
    token_header_value
        .replace("Bearer", "")
        .replace("bearer", "")
        .trim()
        .to_string()
}

fn decode_token(token: &str, ctx: &AutogiftContext) -> anyhow::Result<Claims> {
    let decoding_key = DecodingKey::from_secret(ctx.config.jwt_secret.as_bytes());
    let claims = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))?.claims;

    Ok(claims)
}

/// The hosted auth owns users, the first request of a user creates its local mirror
async fn find_or_create_user(claims: &Claims, ctx: &AutogiftContext) -> Result<User, AutogiftError> {
    let user_id = claims.sub.parse::<ID>().map_err(|_| {
        AutogiftError::Unauthorized("Malformed subject in the provided token".into())
    })?;

    match ctx.repos.users.find(&user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            if !is_valid_email(&claims.email) {
                return Err(AutogiftError::Unauthorized(
                    "Invalid email in the provided token".into(),
                ));
            }
            let user = User::new(user_id, claims.email.clone());
            ctx.repos.users.insert(&user).await.map_err(|e| {
                error!("Unable to create user from token claims: {:?}", e);
                AutogiftError::InternalError
            })?;
            info!("Created user: {} from token claims", user.id);
            Ok(user)
        }
        Err(e) => {
            error!("Unable to look up user from token claims: {:?}", e);
            Err(AutogiftError::InternalError)
        }
    }
}

pub async fn auth_user_req(
    req: &HttpRequest,
    ctx: &AutogiftContext,
) -> Result<Option<(User, Policy)>, AutogiftError> {
    let token = match req.headers().get("authorization") {
        Some(token) => match token.to_str() {
            Ok(token) => parse_authtoken_header(token),
            Err(_) => return Ok(None),
        },
        None => return Ok(None),
    };
    let claims = match decode_token(&token, ctx) {
        Ok(claims) => claims,
        Err(_) => return Ok(None),
    };
    let user = find_or_create_user(&claims, ctx).await?;
    let policy = claims.gifting_policy.unwrap_or_else(Policy::allow_all);
    Ok(Some((user, policy)))
}

pub async fn protect_route(
    req: &HttpRequest,
    ctx: &AutogiftContext,
) -> Result<(User, Policy), AutogiftError> {
    match auth_user_req(req, ctx).await? {
        Some(user_and_policy) => Ok(user_and_policy),
        None => Err(AutogiftError::Unauthorized(
            "Unable to find user from credentials".into(),
        )),
    }
}

/// Admin tooling routes are authenticated with the admin api key
pub fn protect_admin_route(req: &HttpRequest, ctx: &AutogiftContext) -> Result<(), AutogiftError> {
    let api_key = match req.headers().get("x-api-key") {
        Some(api_key) => match api_key.to_str() {
            Ok(api_key) => api_key,
            Err(_) => {
                return Err(AutogiftError::Unauthorized(
                    "Malformed api key provided".to_string(),
                ))
            }
        },
        None => {
            return Err(AutogiftError::Unauthorized(
                "Unable to find api-key in x-api-key header".to_string(),
            ))
        }
    };

    if api_key != ctx.config.admin_api_key {
        return Err(AutogiftError::Unauthorized(
            "Invalid api-key provided in x-api-key header".to_string(),
        ));
    }
    Ok(())
}
