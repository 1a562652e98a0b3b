use yew::prelude::*;

/// Card rotation in degrees for a pointer at (`x`, `y`) inside a box of
/// `width` x `height`, measured from its top-left corner.
pub fn tilt_rotation(x: f64, y: f64, width: f64, height: f64, factor: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    // -1.0 at the left/top edge, 1.0 at the right/bottom edge
    let x_pct = ((x / width - 0.5) * 2.0).clamp(-1.0, 1.0);
    let y_pct = ((y / height - 0.5) * 2.0).clamp(-1.0, 1.0);
    (-y_pct * factor, x_pct * factor)
}

#[derive(Properties, PartialEq)]
pub struct TiltProps {
    #[prop_or(15.0)]
    pub rotation_factor: f64,
    #[prop_or(1500)]
    pub perspective: u32,
    #[prop_or_default]
    pub class: Classes,
    pub children: Children,
}

#[function_component(Tilt)]
pub fn tilt(props: &TiltProps) -> Html {
    let node = use_node_ref();
    let rotation = use_state(|| (0.0_f64, 0.0_f64));

    let onmousemove = {
        let node = node.clone();
        let rotation = rotation.clone();
        let factor = props.rotation_factor;
        Callback::from(move |e: MouseEvent| {
            if let Some(element) = node.cast::<web_sys::Element>() {
                let rect = element.get_bounding_client_rect();
                rotation.set(tilt_rotation(
                    e.client_x() as f64 - rect.left(),
                    e.client_y() as f64 - rect.top(),
                    rect.width(),
                    rect.height(),
                    factor,
                ));
            }
        })
    };

    let onmouseleave = {
        let rotation = rotation.clone();
        Callback::from(move |_: MouseEvent| rotation.set((0.0, 0.0)))
    };

    let (rotate_x, rotate_y) = *rotation;

    html! {
        <div
            ref={node}
            class={classes!("tilt", props.class.clone())}
            style={format!("perspective: {}px; transform-style: preserve-3d;", props.perspective)}
            {onmousemove}
            {onmouseleave}
        >
            <div
                class="tilt-inner"
                style={format!(
                    "transform: rotateX({:.2}deg) rotateY({:.2}deg); transition: transform 0.2s ease-out; transform-style: preserve-3d;",
                    rotate_x, rotate_y
                )}
            >
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_flat() {
        assert_eq!(tilt_rotation(50.0, 50.0, 100.0, 100.0, 8.0), (-0.0, 0.0));
    }

    #[test]
    fn corners_reach_full_factor() {
        let (rx, ry) = tilt_rotation(100.0, 0.0, 100.0, 100.0, 8.0);
        assert_eq!(ry, 8.0);
        assert_eq!(rx, 8.0);

        let (rx, ry) = tilt_rotation(0.0, 100.0, 100.0, 100.0, 8.0);
        assert_eq!(ry, -8.0);
        assert_eq!(rx, -8.0);
    }

    #[test]
    fn pointer_outside_is_clamped() {
        assert_eq!(tilt_rotation(500.0, 50.0, 100.0, 100.0, 10.0).1, 10.0);
    }

    #[test]
    fn degenerate_box_does_not_rotate() {
        assert_eq!(tilt_rotation(10.0, 10.0, 0.0, 100.0, 10.0), (0.0, 0.0));
    }
}
