use super::auth::{Permission, Policy};
use autogift_infra::AutogiftContext;
use futures::future::join_all;
use std::fmt::Debug;
use tracing::error;

/// Side effect that runs after a `UseCase` succeeded, e.g. a welcome email
/// once an address is verified. Failed executions notify no one.
#[async_trait::async_trait(?Send)]
pub trait Subscriber<U: UseCase> {
    async fn notify(&self, response: &U::Response, ctx: &AutogiftContext);
}

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response;
    type Errors;

    /// Name used when tracing the execution
    const NAME: &'static str;

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors>;

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        Vec::new()
    }
}

/// A `UseCase` that changes gifting state on behalf of a user and is
/// therefore bound by the user's `Policy`
pub trait PermissionBoundary: UseCase {
    fn permissions(&self) -> Vec<Permission>;

    /// The error is the message returned to the client
    fn authorize(&self, policy: &Policy) -> Result<(), String> {
        let required = self.permissions();
        if policy.authorize(&required) {
            Ok(())
        } else {
            Err(format!(
                "The gifting policy does not permit all of: {:?}",
                required
            ))
        }
    }
}

#[derive(Debug)]
pub enum UseCaseErrorContainer<T: Debug> {
    Unauthorized(String),
    UseCase(T),
}

#[tracing::instrument(name = "usecase", skip_all, fields(name = U::NAME, bounded = true))]
pub async fn execute_with_policy<U>(
    usecase: U,
    policy: &Policy,
    ctx: &AutogiftContext,
) -> Result<U::Response, UseCaseErrorContainer<U::Errors>>
where
    U: PermissionBoundary,
    U::Errors: Debug,
{
    usecase
        .authorize(policy)
        .map_err(UseCaseErrorContainer::Unauthorized)?;
    run(usecase, ctx).await.map_err(UseCaseErrorContainer::UseCase)
}

#[tracing::instrument(name = "usecase", skip_all, fields(name = U::NAME))]
pub async fn execute<U>(usecase: U, ctx: &AutogiftContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    run(usecase, ctx).await
}

async fn run<U>(mut usecase: U, ctx: &AutogiftContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    let response = match usecase.execute(ctx).await {
        Ok(response) => response,
        Err(e) => {
            error!("Use case {} failed with: {:?}", U::NAME, e);
            return Err(e);
        }
    };

    let subscribers = U::subscribers();
    join_all(subscribers.iter().map(|s| s.notify(&response, ctx))).await;

    Ok(response)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NOTIFIED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct CountGifts {
        fail: bool,
    }

    struct RecordGifts;

    #[async_trait::async_trait(?Send)]
    impl Subscriber<CountGifts> for RecordGifts {
        async fn notify(&self, response: &usize, _ctx: &AutogiftContext) {
            NOTIFIED.fetch_add(*response, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait(?Send)]
    impl UseCase for CountGifts {
        type Response = usize;

        type Errors = String;

        const NAME: &'static str = "CountGifts";

        async fn execute(&mut self, _ctx: &AutogiftContext) -> Result<usize, String> {
            if self.fail {
                Err("out of gifts".into())
            } else {
                Ok(3)
            }
        }

        fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
            vec![Box::new(RecordGifts), Box::new(RecordGifts)]
        }
    }

    impl PermissionBoundary for CountGifts {
        fn permissions(&self) -> Vec<Permission> {
            vec![Permission::CreateAutoGiftRule]
        }
    }

    #[actix_web::main]
    #[test]
    async fn subscribers_only_hear_about_successes() {
        let ctx = AutogiftContext::create_inmemory();

        assert_eq!(execute(CountGifts { fail: true }, &ctx).await, Err("out of gifts".into()));
        assert_eq!(NOTIFIED.load(Ordering::SeqCst), 0);

        assert_eq!(execute(CountGifts { fail: false }, &ctx).await, Ok(3));
        assert_eq!(NOTIFIED.load(Ordering::SeqCst), 6);
    }

    #[actix_web::main]
    #[test]
    async fn policy_is_checked_before_executing() {
        let ctx = AutogiftContext::create_inmemory();

        match execute_with_policy(CountGifts { fail: true }, &Policy::default(), &ctx).await {
            Err(UseCaseErrorContainer::Unauthorized(msg)) => {
                assert!(msg.contains("CreateAutoGiftRule"))
            }
            res => panic!("Unexpected result: {:?}", res),
        }
        assert!(matches!(
            execute_with_policy(CountGifts { fail: true }, &Policy::allow_all(), &ctx).await,
            Err(UseCaseErrorContainer::UseCase(_))
        ));
    }
}
