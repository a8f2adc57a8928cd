use leptos::logging::log;
use leptos::Owner;

/// Runs `f` under an owner captured before an `await`.
/// If the component is gone by the time the request finishes, logs and returns None.
pub fn with_owner_safe<F, R>(owner: Option<Owner>, log_context: &str, f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    match owner {
        Some(owner) => leptos::try_with_owner(owner, f)
            .map_err(|e| {
                log!("[OWNER] {} finished after disposal: {:?}", log_context, e);
            })
            .ok(),
        None => {
            log!("[OWNER] No Leptos owner in context: {}", log_context);
            None
        }
    }
}
