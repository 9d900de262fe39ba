//! Per-request GraphQL context
//!
//! Every operation carries its own [`Principal`] and a fresh [`Loaders`]
//! registry. The stores are schema-wide data shared by all requests.

use async_graphql::{Context, Request, Result};
use tokio_util::sync::CancellationToken;

use super::loaders::Loaders;
use crate::models::Principal;
use crate::repositories::Stores;

/// Attach the caller and a new loader registry to an incoming request
pub fn prepare_request(
    request: Request,
    stores: &Stores,
    principal: Principal,
    cancel: CancellationToken,
) -> Request {
    request
        .data(principal)
        .data(Loaders::new(stores, cancel))
}

pub fn principal<'a>(ctx: &Context<'a>) -> Result<&'a Principal> {
    ctx.data::<Principal>()
}

pub fn loaders<'a>(ctx: &Context<'a>) -> Result<&'a Loaders> {
    ctx.data::<Loaders>()
}

pub fn stores<'a>(ctx: &Context<'a>) -> Result<&'a Stores> {
    ctx.data::<Stores>()
}
