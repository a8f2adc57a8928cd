/// Main application entry point for SurveyWare.
/// Routes between the survey form and the list of collected reviews.
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use crate::components::{review_form::ReviewForm, reviews_list::ReviewsList};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/surveyware.css" />
        <Title text="SurveyWare" />
        <Router>
            <nav>
                <A href="/">{ "Submit a review" }</A>
                { " | " }
                <A href="/reviews">{ "All reviews" }</A>
            </nav>
            <main>
                <Routes>
                    <Route path="/" view=ReviewForm />
                    <Route path="/reviews" view=ReviewsList />
                </Routes>
            </main>
        </Router>
    }
}
