#![allow(non_snake_case)]
mod pages;
mod components;
mod utils;

use components::template::{AuthState, Template};
use dioxus::prelude::*;
use pages::{
    callbacks::{OAuthCallback, PaymentFail, PaymentSuccess},
    home::Home,
    market::{Market, StrategyDetail, StrategyItemDetail},
    mypage::MyPage,
    studio::Studio
};
use utils::{api::ApiClient, config::BACKEND_URL, session::Session};

#[derive(Routable, PartialEq, Clone)]
enum Route {
    #[layout(Template)]
    #[route("/")]
    Home {},
    #[route("/market")]
    Market {},
    #[route("/market/strategies/:id")]
    StrategyDetail { id: i64 },
    #[route("/market/strategy-items/:id")]
    StrategyItemDetail { id: i64 },
    #[route("/studio")]
    Studio {},
    #[route("/mypage")]
    MyPage {},
    #[route("/oauth/callback/:provider")]
    OAuthCallback { provider: String },
    #[route("/toss-payment-success")]
    PaymentSuccess {},
    #[route("/toss-payment-fail")]
    PaymentFail {},
    #[route("/:..route")]
    PageNotFound { route: Vec<String> }
}

fn main() {
    dioxus::launch(App);
}

fn App() -> Element {
    let session = use_hook(Session::browser);
    let signed_in = use_signal(|| session.is_authenticated());
    use_context_provider(|| ApiClient::new(BACKEND_URL, session.clone()));
    use_context_provider(|| AuthState { signed_in });
    rsx! { Router::<Route> {} }
}

#[component]
fn PageNotFound(route: Vec<String>) -> Element {
    rsx! {
        h1 { "Page not found" }
        p { "We are terribly sorry, but the page you requested doesn't exist." }
        pre { color: "red", "log:\nattemped to navigate to: {route:?}" }
    }
}
