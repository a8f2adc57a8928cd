use leptos::*;
use crate::models::review::{FieldKind, ReviewDraft, ReviewField};

/// One required survey control bound to its slot in the shared draft.
/// Option-set fields render as a select, numeric fields as a number input.
#[component]
pub fn FieldInput(field: ReviewField, draft: RwSignal<ReviewDraft>) -> impl IntoView {
    let value = move || draft.with(|d| d.get(field).to_string());

    let handle_input = move |e: ev::Event| {
        let new_value = event_target_value(&e);
        draft.update(|d| d.set(field, new_value));
    };

    match field.kind() {
        FieldKind::Choice(options) => view! {
            <select
                class="ratinginputu"
                name=field.name()
                required=true
                prop:value=value
                on:change=handle_input
            >
                <option value="" disabled=true selected=move || value().is_empty()>
                    { field.prompt() }
                </option>
                {options.iter().map(|option| view! {
                    <option value=*option>{ *option }</option>
                }).collect_view()}
            </select>
        }
        .into_view(),
        FieldKind::Integer { .. } => view! {
            <input
                type="number"
                step="1"
                name=field.name()
                placeholder=field.prompt()
                required=true
                prop:value=value
                on:input=handle_input
            />
        }
        .into_view(),
        FieldKind::Decimal => view! {
            <input
                type="number"
                step="any"
                name=field.name()
                placeholder=field.prompt()
                required=true
                prop:value=value
                on:input=handle_input
            />
        }
        .into_view(),
    }
}
