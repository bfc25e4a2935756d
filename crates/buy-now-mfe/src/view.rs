//! Leptos rendering of the Buy Now button

use std::rc::Rc;

use buy_now_core::button::{
    ButtonController, BUTTON_CLASS, LOADING_CLASS, PRICE_CLASS, PROCESSING_LABEL, SECTION_CLASS,
};
use leptos::prelude::*;

/// Button bound to one controller. The processing flag is mirrored into a
/// signal; everything else is fixed by the instance's configuration.
#[component]
pub fn BuyNowButton(
    /// Controller of the instance being rendered
    button: Rc<ButtonController>,
) -> impl IntoView {
    let (processing, set_processing) = signal(button.is_processing());
    button.observe_processing(move |busy| set_processing.set(busy));

    let enabled = button.config().enabled;
    let style = button.appearance().inline_style();
    let idle = button.idle_label();
    let loading_class = format!("{BUTTON_CLASS} {LOADING_CLASS}");
    let button = StoredValue::new_local(button);

    view! {
        <div class=SECTION_CLASS>
            <button
                class=move || if processing.get() { loading_class.clone() } else { BUTTON_CLASS.to_string() }
                disabled=move || !enabled || processing.get()
                style=style
                on:click=move |_| {
                    let button = button.get_value();
                    wasm_bindgen_futures::spawn_local(async move {
                        let outcome = button.activate().await;
                        tracing::debug!(?outcome, "activation settled");
                    });
                }
            >
                {move || {
                    if processing.get() {
                        view! { <span>{PROCESSING_LABEL}</span> }.into_any()
                    } else {
                        let price = idle
                            .price
                            .clone()
                            .map(|price| view! { <span class=PRICE_CLASS>{price}</span> });
                        view! {
                            <span>{idle.text.clone()}</span>
                            {price}
                        }
                        .into_any()
                    }
                }}
            </button>
        </div>
    }
}
