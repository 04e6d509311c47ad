//! UI components for the marketplace console.

use std::time::Duration;

use dioxus::prelude::*;
use market::util::format_sol;
use market::{MarketAction, WalletStatus};

use crate::app::state::{SharedAppState, SHARED_STATE};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wallet status and wallet-level controls.
#[component]
pub fn WalletCard(status: WalletStatus, on_change: EventHandler<()>) -> Element {
    let app_state = use_context::<SharedAppState>();
    let mut message = use_signal(String::new);
    let mut balance = use_signal(|| None::<u64>);

    let connected = status.pubkey.is_some();
    let wallet_display = status
        .pubkey
        .clone()
        .unwrap_or_else(|| "Not connected".to_string());

    let connect_state = app_state.clone();
    let connect = move |_| {
        match connect_state.connect_keypair_file() {
            Ok(key) => message.set(format!("Connected {key}")),
            Err(e) => message.set(format!("Error: {e}")),
        }
        balance.set(None);
        on_change.call(());
    };

    let disconnect_state = app_state.clone();
    let disconnect = move |_| {
        disconnect_state.disconnect_wallet();
        message.set(String::new());
        balance.set(None);
        on_change.call(());
    };

    let airdrop_state = app_state.clone();
    let airdrop = move |_| {
        let state = airdrop_state.clone();
        spawn(async move {
            message.set("Requesting airdrop...".to_string());
            match state.airdrop().await {
                Ok(sig) => {
                    message.set(format!("Airdrop confirmed: {sig}"));
                    if let Ok(lamports) = state.balance().await {
                        balance.set(Some(lamports));
                    }
                }
                Err(e) => {
                    tracing::error!("Airdrop failed: {}", e);
                    message.set(format!("Error: {e}"));
                }
            }
        });
    };

    let balance_state = app_state.clone();
    let refresh_balance = move |_| {
        let state = balance_state.clone();
        spawn(async move {
            match state.balance().await {
                Ok(lamports) => balance.set(Some(lamports)),
                Err(e) => message.set(format!("Error: {e}")),
            }
        });
    };

    let balance_display = balance().map_or_else(|| "-".to_string(), format_sol);

    rsx! {
        div {
            class: "status-card",

            h2 { "Wallet" }

            div {
                class: "status-grid",

                span { class: "label", "Wallet:" }
                span {
                    class: if connected { "connected node-id" } else { "connecting" },
                    "{wallet_display}"
                }

                span { class: "label", "Balance:" }
                span { "{balance_display}" }

                span { class: "label", "Cluster:" }
                span { "{status.cluster}" }

                span { class: "label", "RPC:" }
                span { class: "node-id", "{status.endpoint}" }
            }

            div {
                class: "wallet-buttons",

                if connected {
                    button { class: "refresh-btn", onclick: disconnect, "Disconnect" }
                    button { class: "refresh-btn", onclick: refresh_balance, "Balance" }
                    button { class: "refresh-btn", onclick: airdrop, "Airdrop 1 SOL" }
                } else {
                    button { class: "submit-btn", onclick: connect, "Connect wallet" }
                }
            }

            if !message.read().is_empty() {
                div { class: "result", "{message}" }
            }
        }
    }
}

/// One marketplace action. Each click submits a new transaction, even if an
/// earlier one is still in flight.
#[component]
pub fn ActionButton(action: MarketAction, connected: bool) -> Element {
    let app_state = use_context::<SharedAppState>();
    let mut result = use_signal(String::new);

    let on_click = move |_| {
        let state = app_state.clone();
        spawn(async move {
            result.set(format!("Submitting {action}..."));
            match state.run(action).await {
                Ok(receipt) => result.set(format!("{} tx: {}", receipt.action, receipt.explorer_url)),
                Err(e) => {
                    tracing::error!("{} failed: {}", action, e);
                    result.set(format!("Error: {e}"));
                }
            }
        });
    };

    rsx! {
        div {
            class: "action",

            button {
                class: "action-btn",
                disabled: !connected,
                onclick: on_click,
                "{action}"
            }

            if !result.read().is_empty() {
                div { class: "result", "{result}" }
            }
        }
    }
}

/// Main application component.
pub fn app() -> Element {
    // Provide shared state to all child components via Dioxus context
    let app_state = SHARED_STATE
        .get()
        .expect("SHARED_STATE must be initialized before launching UI")
        .clone();
    use_context_provider(|| app_state.clone());

    let mut status = use_signal(|| app_state.wallet_status());

    // Poll wallet status
    let poll_state = app_state.clone();
    let _status_poller = use_resource(move || {
        let state = poll_state.clone();
        async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                status.set(state.wallet_status());
            }
        }
    });

    let refresh_state = app_state.clone();
    let refresh = move |()| status.set(refresh_state.wallet_status());

    let current = status.read().clone();
    let connected = current.pubkey.is_some();

    rsx! {
        document::Stylesheet { href: asset!("/assets/styles.css") }

        div {
            class: "container",

            h1 { "Soundwork Marketplace" }
            span { class: "version", "v{VERSION}" }

            WalletCard { status: current.clone(), on_change: refresh }

            div {
                class: "actions",

                for action in MarketAction::ALL {
                    ActionButton { key: "{action:?}", action, connected }
                }
            }
        }
    }
}
