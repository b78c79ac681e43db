//! Wishlist commands. The user is always the one in the saved session.

use estore_client::{ApiTransport, ClientError, WishlistClient};
use estore_core::Wishlist;

/// Which wishlist operation to run.
#[derive(Debug, Clone)]
pub enum Action {
    Add(String),
    List,
    Remove(String),
}

/// Run a wishlist operation as the logged-in user and log the result.
///
/// # Errors
///
/// Returns `ClientError::Unauthorized` when not logged in, otherwise
/// whatever the wishlist call returns.
pub async fn run(transport: ApiTransport, action: Action) -> Result<(), ClientError> {
    let identity = transport.session().current().ok_or_else(|| {
        ClientError::Unauthorized("not logged in (run `estore login`)".to_string())
    })?;
    let user_id = identity.id.as_str();
    let client = WishlistClient::new(transport);

    let wishlist = match &action {
        Action::Add(product_id) => client.add_to_wishlist(user_id, product_id).await?,
        Action::List => client.get_wishlist(user_id).await?,
        Action::Remove(product_id) => client.remove_from_wishlist(user_id, product_id).await?,
    };

    show(&wishlist);
    Ok(())
}

fn show(wishlist: &Wishlist) {
    if wishlist.is_empty() {
        tracing::info!("Wishlist is empty");
        return;
    }

    tracing::info!("Wishlist ({} items):", wishlist.len());
    for entry in &wishlist.entries {
        tracing::info!(
            "  {}  added {}",
            entry.product_id,
            entry.added_at.format("%Y-%m-%d %H:%M")
        );
    }
}
