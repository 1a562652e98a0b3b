use yew::prelude::*;
use yew_hooks::use_interval;

pub const ROLES: [&str; 5] = [
    "Founders",
    "Sales teams",
    "Recruiters",
    "Agencies",
    "Consultants",
];

const ROTATE_MS: u32 = 2500;

pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1) % len
    }
}

/// Hero line that cycles through who the leads are for.
#[function_component(RoleRotator)]
pub fn role_rotator() -> Html {
    let index = use_state(|| 0usize);

    {
        let index = index.clone();
        use_interval(move || index.set(next_index(*index, ROLES.len())), ROTATE_MS);
    }

    html! {
        <span class="role-rotator" aria-live="polite">
            { for ROLES.iter().enumerate().map(|(i, role)| html! {
                <span
                    key={*role}
                    class={classes!("role-item", (i == *index).then(|| "active"))}
                    aria-hidden={(i != *index).to_string()}
                >
                    {*role}
                </span>
            }) }
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_last_role() {
        assert_eq!(next_index(ROLES.len() - 1, ROLES.len()), 0);
        assert_eq!(next_index(1, ROLES.len()), 2);
    }

    #[test]
    fn empty_list_stays_at_zero() {
        assert_eq!(next_index(3, 0), 0);
    }
}
