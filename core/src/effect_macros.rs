//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block body
///
/// The body runs inside `async move` and must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use receipts_core::async_effect;
///
/// let client = Arc::clone(&env.client);
/// async_effect! {
///     match client.fetch_receipts().await {
///         Ok(receipts) => Some(ReceiptEvent::ReceiptsLoaded { generation, receipts }),
///         Err(error) => Some(ReceiptEvent::ErrorRaised(error)),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_moves_captures() {
        let value = 7;
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future effect");
        };
        assert_eq!(fut.await, Some(TestAction::AsyncResult { value: 7 }));
    }
}
