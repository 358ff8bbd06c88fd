//! Where transaction records come from.
//!
//! This module defines the [`TransactionSource`] (async) and
//! [`BlockingTransactionSource`] (blocking) traits via a shared macro,
//! mirroring the client generation pattern in [`crate::client`]. The HTTP
//! clients implement both; [`InMemorySource`] serves fixed data.

mod memory;

pub use memory::InMemorySource;

/// Generates a source trait (async or blocking) with all methods.
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
macro_rules! define_source {
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: $mode:ident,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_source!(@methods $mode);
        }
    };

    (@methods $mode:ident) => {
        define_source!(@method $mode, fetch_transactions,
            "Fetches the viewer's full transaction history.\n\nAn empty history is `Ok(vec![])`, never an error.\n\n# Errors\n\nReturns an error if the history could not be retrieved.",
            -> Result<Vec<TransactionRecord>>);
        define_source!(@method $mode, resolve_viewer_account,
            "Returns the account number of the authenticated viewer.\n\n`Ok(None)` means the viewer is unknown; transfers are then never\nclassified as incoming.\n\n# Errors\n\nReturns an error if the account details could not be retrieved.",
            -> Result<Option<AccountNumber>>);
    };

    (@method blocking, $name:ident, $doc:expr, -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self) -> $ret;
    };

    (@method async_mode, $name:ident, $doc:expr, -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self) -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_source {
    //! Async source trait definition.

    use crate::error::Result;
    use crate::models::{AccountNumber, TransactionRecord};

    define_source! {
        trait_name: TransactionSource,
        trait_doc: "Async provider of the viewer's transaction history.",
        mode: async_mode,
    }
}

mod blocking_source {
    //! Blocking source trait definition.

    use crate::error::Result;
    use crate::models::{AccountNumber, TransactionRecord};

    define_source! {
        trait_name: BlockingTransactionSource,
        trait_doc: "Blocking provider of the viewer's transaction history.",
        mode: blocking,
    }
}

#[cfg(feature = "async")]
pub use async_source::TransactionSource;
pub use blocking_source::BlockingTransactionSource;
