use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;
use crate::session::{SessionAction, use_session};

#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let session = use_session();
    let (_, dispatch) = use_store::<State>();

    Callback::from(move |_| {
        session.dispatch(SessionAction::Logout);
        dispatch.reduce_mut(|state| state.logout());
    })
}
