//! Grid of lead sources with counters that tick up while the page is open.
//! The numbers are illustrative, not live data.

use yew::prelude::*;
use yew_hooks::use_interval;

const TICK_MS: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub name: &'static str,
    pub logo: &'static str,
    pub base: u64,
    pub step: u64,
}

pub const SOURCES: [Source; 6] = [
    Source { name: "LinkedIn", logo: "/assets/sources/linkedin.svg", base: 18_240, step: 7 },
    Source { name: "Facebook", logo: "/assets/sources/facebook.svg", base: 9_415, step: 3 },
    Source { name: "Crunchbase", logo: "/assets/sources/crunchbase.svg", base: 4_102, step: 2 },
    Source { name: "Company registries", logo: "/assets/sources/registry.svg", base: 12_877, step: 5 },
    Source { name: "Job boards", logo: "/assets/sources/jobs.svg", base: 6_530, step: 4 },
    Source { name: "Business directories", logo: "/assets/sources/directory.svg", base: 7_963, step: 3 },
];

/// Counter value after `tick` ticks. The increment varies between 1 and
/// 3 x `step` so the grid doesn't move in lockstep.
pub fn counter_value(source: &Source, tick: u64) -> u64 {
    let mut value = source.base;
    for t in 0..tick {
        value += source.step * (1 + (t + source.base) % 3);
    }
    value
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[function_component(SourceGrid)]
pub fn source_grid() -> Html {
    let counts = use_state(|| SOURCES.iter().map(|s| s.base).collect::<Vec<u64>>());
    let tick = use_mut_ref(|| 0u64);

    {
        let counts = counts.clone();
        use_interval(
            move || {
                let t = *tick.borrow();
                *tick.borrow_mut() = t + 1;
                counts.set(
                    SOURCES
                        .iter()
                        .map(|s| counter_value(s, t + 1))
                        .collect(),
                );
            },
            TICK_MS,
        );
    }

    html! {
        <div class="source-grid">
            { for SOURCES.iter().zip(counts.iter()).map(|(source, count)| html! {
                <div class="source-card reveal" key={source.name}>
                    <img src={source.logo} alt={source.name} loading="lazy" />
                    <div class="source-name">{source.name}</div>
                    <div class="source-count">{format_count(*count)}</div>
                    <div class="source-caption">{"profiles scanned"}</div>
                </div>
            }) }
        </div>
    }
}
