use resource::{AsyncResource, FailureMessage, Phase, display_message};
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

/// Hook return type for resources that load on their own.
pub struct ApiHookReturn<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
    pub refetch: Callback<()>,
}

impl<T> ApiHookReturn<T> {
    /// Render based on resource state with contextual loading/error messages.
    ///
    /// - No data + loading: "Cargando {context}..."
    /// - No data + error: the error with a retry button
    /// - Has data: `render_fn(data, loading, error)`, where `error` comes
    ///   from a failed refetch and the previous data is still shown
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        match &self.data {
            Some(data) => render_fn(data, self.loading, self.error.as_ref()),
            None => {
                if let Some(error) = &self.error {
                    let retry = self.refetch.reform(|_: MouseEvent| ());
                    html! {
                        <div class="p-4 rounded-md bg-red-50 \
                                   dark:bg-red-900/20 border \
                                   border-red-200 dark:border-red-800">
                            <p class="text-sm text-red-700 \
                                      dark:text-red-400">
                                {format!("Error al cargar {}: {}", context, error)}
                            </p>
                            <button
                                class="mt-2 text-sm underline"
                                onclick={retry}
                            >
                                {"Reintentar"}
                            </button>
                        </div>
                    }
                } else if self.loading || self.phase == Phase::Idle {
                    html! {
                        <div class="text-center py-12">
                            <p class="text-neutral-600 dark:text-neutral-400">
                                {format!("Cargando {}...", context)}
                            </p>
                        </div>
                    }
                } else {
                    html! {
                        <div class="text-center py-12">
                            <p class="text-neutral-600 dark:text-neutral-400">
                                {format!("No hay {}", context)}
                            </p>
                        </div>
                    }
                }
            }
        }
    }
}

/// Bind an [`AsyncResource`] to the component lifecycle.
///
/// The resource is created once and survives re-renders. Every render
/// installs the latest `operation` so it sees current props and state.
/// Each state change re-renders the component, and unmounting disposes the
/// resource. With `auto_run`, the first render and every change of `deps`
/// start an invocation whose failure is only logged here (it is already
/// recorded on the resource).
#[hook]
pub fn use_resource<T, E, D, F, Fut>(
    deps: D,
    operation: F,
    auto_run: bool,
) -> AsyncResource<T, E, D>
where
    T: Clone + 'static,
    E: FailureMessage + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let operation = Rc::new(operation);
    let resource = use_state({
        let operation = Rc::clone(&operation);
        move || AsyncResource::new(move || operation(), auto_run)
    });
    resource.replace_operation(move || operation());

    // Registered before the dependency effect so the first invocation is
    // already observed.
    {
        let resource = (*resource).clone();
        let update = use_force_update();
        use_effect_with((), move |_| {
            resource.set_listener(move || update.force_update());
            move || resource.dispose()
        });
    }

    {
        let resource = (*resource).clone();
        use_effect_with(deps, move |deps| {
            if let Some(invocation) = resource.sync_dependencies(deps.clone()) {
                yew::platform::spawn_local(async move {
                    if let Err(e) = invocation.await {
                        tracing::debug!("auto-run failed: {}", display_message(&e));
                    }
                });
            }
        });
    }

    (*resource).clone()
}

/// Resource that loads on mount and whenever `deps` changes.
///
/// # Example
///
/// ```rust,ignore
/// #[hook]
/// pub fn use_movie(movie_id: MovieId) -> ApiHookReturn<Movie> {
///     let api_client = use_api_client();
///     use_api(movie_id.clone(), move || {
///         let api_client = api_client.clone();
///         let movie_id = movie_id.clone();
///         async move { api_client.get_movie(&movie_id).await }
///     })
/// }
/// ```
#[hook]
pub fn use_api<T, E, D, F, Fut>(deps: D, operation: F) -> ApiHookReturn<T>
where
    T: Clone + 'static,
    E: FailureMessage + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let resource = use_resource(deps, operation, true);
    let state = resource.snapshot();

    let refetch = Callback::from(move |_| {
        let invocation = resource.refetch();
        yew::platform::spawn_local(async move {
            if let Err(e) = invocation.await {
                tracing::debug!("refetch failed: {}", display_message(&e));
            }
        });
    });

    ApiHookReturn {
        data: state.data,
        loading: state.loading,
        error: state.error,
        phase: state.phase,
        refetch,
    }
}

/// Resource that only runs when the caller invokes it, e.g. a form submit.
///
/// The returned handle's [`execute`](AsyncResource::execute) yields the
/// operation's result so the caller can react to it.
#[hook]
pub fn use_action<T, E, F, Fut>(operation: F) -> AsyncResource<T, E>
where
    T: Clone + 'static,
    E: FailureMessage + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    use_resource((), operation, false)
}
