use payloads::requests::LoginCredentials;
use resource::display_message;
use yew::prelude::*;

use super::use_action;
use crate::get_api_client;
use crate::session::{AuthenticatedUser, SessionAction, use_session};

pub struct LoginHookReturn {
    pub pending: bool,
    pub error: Option<String>,
    pub submit: Callback<LoginCredentials>,
}

#[hook]
pub fn use_login() -> LoginHookReturn {
    let session = use_session();
    let credentials = use_mut_ref(|| None::<LoginCredentials>);

    let action = {
        let credentials = credentials.clone();
        use_action(move || {
            let credentials = credentials.borrow().clone();
            async move {
                let credentials = credentials.ok_or("Introduce tu email y contraseña")?;
                get_api_client()
                    .login(&credentials)
                    .await
                    .map_err(|e| display_message(&e))
            }
        })
    };

    let submit = {
        let action = action.clone();
        Callback::from(move |details: LoginCredentials| {
            *credentials.borrow_mut() = Some(details);
            let invocation = action.execute();
            let session = session.clone();
            yew::platform::spawn_local(async move {
                match invocation.await {
                    Ok(response) => {
                        tracing::info!(user = %response.user.username, "logged in");
                        session.dispatch(SessionAction::Login(AuthenticatedUser {
                            user: response.user,
                            token: response.token,
                        }));
                    }
                    Err(e) => tracing::debug!("login refused: {e}"),
                }
            });
        })
    };

    LoginHookReturn {
        pending: action.loading(),
        error: action.error(),
        submit,
    }
}
