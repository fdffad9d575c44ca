use leptos::prelude::*;

use crate::components::copy_button::CopyButton;
use crate::components::flow_diagram::FlowDiagramCanvas;
use crate::components::flow_diagram::layout::INSTALL_COMMAND;
use crate::components::typing::TypingAnimation;
use crate::config::DiagramConfig;

/// Landing page hero: the product diagram behind the install prompt.
#[component]
pub fn Home() -> impl IntoView {
	let config = DiagramConfig::default();
	let (typing_speed, copy_reset) = (config.typing_speed, config.copy_reset);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section class="hero">
				<div class="hero-diagram">
					<FlowDiagramCanvas config=config />
				</div>
				<div class="hero-prompt">
					<TypingAnimation text=INSTALL_COMMAND speed=typing_speed />
					<CopyButton text=Signal::stored(INSTALL_COMMAND.to_string()) reset=copy_reset />
				</div>
			</section>
		</ErrorBoundary>
	}
}
