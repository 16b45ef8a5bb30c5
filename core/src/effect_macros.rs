//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use marketplace_core::async_effect;
///
/// async_effect! {
///     let confirmation = api.create_booking(request).await;
///     Some(WizardAction::from(confirmation))
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

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use marketplace_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3),
///     action: BannerAction::Hide
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Future` registered under a cancellation scope
///
/// # Example
///
/// ```rust,ignore
/// use marketplace_core::cancellable_effect;
///
/// cancellable_effect! {
///     id: SUBMISSION,
///     async {
///         let result = api.create_booking(request).await;
///         Some(WizardAction::submission_settled(result))
///     }
/// }
/// ```
#[macro_export]
macro_rules! cancellable_effect {
    (
        id: $id:expr,
        async { $($body:tt)* }
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::async_effect! { $($body)* }),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded { value: i32 },
        Hide,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(3),
            action: TestAction::Hide
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_effect_macro() {
        const LOAD: EffectId = EffectId::new("load");

        let effect = cancellable_effect! {
            id: LOAD,
            async {
                Some(TestAction::Loaded { value: 1 })
            }
        };

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, LOAD);
                assert!(matches!(*effect, Effect::Future(_)));
            },
            _ => unreachable!("macro always builds a cancellable effect"),
        }
    }
}
