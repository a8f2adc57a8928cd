use leptos::logging::error;
use leptos::*;

use crate::client;
use crate::models::review::{Review, ReviewField};
use crate::utils::leptos_owner::with_owner_safe;

/// Every stored review, newest first, each with a delete button.
#[component]
pub fn ReviewsList() -> impl IntoView {
    let reviews = create_local_resource(
        || (),
        |_| async move { client::fetch_reviews().await.map_err(|e| e.to_string()) },
    );
    let (error_message, set_error_message) = create_signal(None::<String>);

    let delete = move |id: String| {
        let owner = Owner::current();
        spawn_local(async move {
            let result = client::delete_review(&id).await;
            with_owner_safe(owner, "review deletion", move || match result {
                Ok(()) => {
                    set_error_message.set(None);
                    reviews.refetch();
                }
                Err(e) => {
                    error!("[LIST] Failed to delete review {}: {}", id, e);
                    set_error_message.set(Some("Failed to delete the review.".to_string()));
                }
            });
        });
    };

    let render_row = move |review: Review| {
        let id = review.id.clone();
        view! {
            <tr>
                {ReviewField::ALL.into_iter().map(|field| view! {
                    <td>{ review.display_value(field) }</td>
                }).collect_view()}
                <td>
                    {review.image.clone().map(|src| view! { <img src=src alt="Review image" /> })}
                </td>
                <td>{ review.created_at.format("%Y-%m-%d %H:%M").to_string() }</td>
                <td>
                    <button on:click=move |_| delete(id.clone())>{ "Delete" }</button>
                </td>
            </tr>
        }
    };

    view! {
        <div>
            <h2>{ "Reviews" }</h2>
            {move || error_message.get().map(|message| view! {
                <p class="error-message">{ message }</p>
            })}
            <Suspense fallback=move || view! { <p>{ "Loading reviews..." }</p> }>
                {move || reviews.get().map(|result| match result {
                    Ok(list) if list.is_empty() => view! { <p>{ "No reviews yet." }</p> }.into_view(),
                    Ok(list) => view! {
                        <table class="reviews-table">
                            <thead>
                                <tr>
                                    {ReviewField::ALL.into_iter().map(|field| view! {
                                        <th>{ field.heading() }</th>
                                    }).collect_view()}
                                    <th>{ "Image" }</th>
                                    <th>{ "Submitted" }</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {list.into_iter().map(render_row).collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_view(),
                    Err(e) => {
                        error!("[LIST] Failed to fetch reviews: {}", e);
                        view! { <p class="error-message">{ "Failed to load reviews." }</p> }.into_view()
                    }
                })}
            </Suspense>
        </div>
    }
}
