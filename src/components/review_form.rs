use leptos::ev::SubmitEvent;
use leptos::logging::{error, log};
use leptos::*;
use web_sys::{File, Url};

use crate::client;
use crate::components::field_input::FieldInput;
use crate::models::review::{ReviewDraft, ReviewField, IMAGE_FIELD};
use crate::utils::leptos_owner::with_owner_safe;

pub const SUBMIT_SUCCESS: &str = "Review submitted successfully!";
pub const SUBMIT_FAILURE: &str = "Failed to submit the review. Please try again.";

#[component]
pub fn ReviewForm() -> impl IntoView {
    let draft = create_rw_signal(ReviewDraft::default());
    let (error_message, set_error_message) = create_signal(None::<String>);
    let (confirmation, set_confirmation) = create_signal(None::<String>);
    let (image_preview, set_image_preview) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);
    let image_input = create_node_ref::<html::Input>();

    let selected_image = move || -> Option<File> {
        image_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    };

    // Object URLs hold the file in memory until revoked
    let replace_preview = move |url: Option<String>| {
        if let Some(old) = image_preview.get_untracked() {
            let _ = Url::revoke_object_url(&old);
        }
        set_image_preview.set(url);
    };

    let handle_image_change = move |_: ev::Event| {
        let url = selected_image().and_then(|file| Url::create_object_url_with_blob(&file).ok());
        replace_preview(url);
    };

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_submitting.set(true);

        let snapshot = draft.get_untracked();
        let image = selected_image();
        let owner = Owner::current();

        spawn_local(async move {
            let result = client::submit_review(&snapshot, image.as_ref()).await;
            with_owner_safe(owner, "review submission", move || {
                set_submitting.set(false);
                match result {
                    Ok(()) => {
                        log!("[FORM] Review submitted, resetting form");
                        draft.update(ReviewDraft::clear);
                        if let Some(input) = image_input.get_untracked() {
                            input.set_value("");
                        }
                        replace_preview(None);
                        set_error_message.set(None);
                        set_confirmation.set(Some(SUBMIT_SUCCESS.to_string()));
                    }
                    Err(e) => {
                        // Entered values stay in place for another try
                        error!("[FORM] Error submitting review: {}", e);
                        set_confirmation.set(None);
                        set_error_message.set(Some(SUBMIT_FAILURE.to_string()));
                    }
                }
            });
        });
    };

    view! {
        <div class="review-container">
            <h2>{ "Submit Your Answer" }</h2>
            {move || error_message.get().map(|message| view! {
                <p class="error-message">{ message }</p>
            })}
            {move || confirmation.get().map(|message| view! {
                <p class="success-message">{ message }</p>
            })}
            <form on:submit=handle_submit>
                {ReviewField::ALL.into_iter().map(|field| view! {
                    <FieldInput field=field draft=draft />
                }).collect_view()}
                <div class="image-upload">
                    <label for="image">{ "Upload Image (Optional):" }</label>
                    <input
                        type="file"
                        id="image"
                        name=IMAGE_FIELD
                        accept="image/*"
                        node_ref=image_input
                        on:change=handle_image_change
                    />
                    {move || image_preview.get().map(|src| view! {
                        <div class="image-preview">
                            <img src=src alt="Preview" />
                        </div>
                    })}
                </div>
                <button type="submit" disabled=move || submitting.get()>{ "Submit" }</button>
            </form>
        </div>
    }
}
