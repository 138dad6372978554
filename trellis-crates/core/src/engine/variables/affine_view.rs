use std::cmp::Ordering;

use enumset::EnumSet;

use super::DomainMutable;
use super::DomainQueryable;
use super::EventPublisher;
use super::TransformableVariable;
use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::DomainResult;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainMutation;
use crate::math::num_ext::saturate_to_i32;
use crate::math::num_ext::NumExt;
use crate::propagation::Domains;
use crate::propagation::DomainsMut;

/// Models the constraint `y = ax + b`, by expressing the domain of `y` as a transformation of the
/// domain of `x`.
///
/// A view owns no state: every read is mapped through the transformation and every reduction is
/// inverted onto the inner variable.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct AffineView<Inner> {
    inner: Inner,
    scale: i32,
    offset: i32,
}

impl<Inner> AffineView<Inner> {
    pub fn new(inner: Inner, scale: i32, offset: i32) -> Self {
        assert_ne!(scale, 0, "Multiplication by zero is not invertable");
        AffineView {
            inner,
            scale,
            offset,
        }
    }

    pub fn inner(&self) -> &Inner {
        &self.inner
    }

    /// Apply the inverse transformation of this view on a value, to go from the value in the domain
    /// of `self` to a value in the domain of `self.inner`.
    fn invert(&self, value: i32, rounding: Rounding) -> i32 {
        let inverted_translation = i64::from(value) - i64::from(self.offset);
        let scale = i64::from(self.scale);

        saturate_to_i32(match rounding {
            Rounding::Up => <i64 as NumExt>::div_ceil(inverted_translation, scale),
            Rounding::Down => <i64 as NumExt>::div_floor(inverted_translation, scale),
        })
    }

    /// Whether `value` is the image of some value of the inner variable.
    fn is_image(&self, value: i32) -> bool {
        (i64::from(value) - i64::from(self.offset)) % i64::from(self.scale) == 0
    }

    /// Values whose image does not fit in an `i32` saturate.
    fn map(&self, value: i32) -> i32 {
        saturate_to_i32(i64::from(self.scale) * i64::from(value) + i64::from(self.offset))
    }

    fn flip_bounds(&self, event: DomainEvent) -> DomainEvent {
        if self.scale.is_positive() {
            return event;
        }

        match event {
            DomainEvent::LowerBound => DomainEvent::UpperBound,
            DomainEvent::UpperBound => DomainEvent::LowerBound,
            event => event,
        }
    }
}

impl<View: IntegerVariable> DomainQueryable for AffineView<View> {
    fn lower_bound(&self, domains: Domains<'_>) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.upper_bound(domains))
        } else {
            self.map(self.inner.lower_bound(domains))
        }
    }

    fn upper_bound(&self, domains: Domains<'_>) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.lower_bound(domains))
        } else {
            self.map(self.inner.upper_bound(domains))
        }
    }

    fn size(&self, domains: Domains<'_>) -> usize {
        self.inner.size(domains)
    }

    fn contains(&self, domains: Domains<'_>, value: i32) -> bool {
        if self.is_image(value) {
            let inverted = self.invert(value, Rounding::Up);
            self.inner.contains(domains, inverted)
        } else {
            false
        }
    }

    fn has_enumerated_domain(&self, domains: Domains<'_>) -> bool {
        self.inner.has_enumerated_domain(domains)
    }

    fn iterate_domain<'a>(&'a self, domains: Domains<'a>) -> impl Iterator<Item = i32> + 'a {
        self.inner
            .iterate_domain(domains)
            .map(|value| self.map(value))
    }
}

impl<View: IntegerVariable> DomainMutable for AffineView<View> {
    fn remove_value(&self, domains: &mut DomainsMut<'_>, value: i32, cause: Cause) -> DomainResult {
        if !self.is_image(value) {
            return Ok(false);
        }

        let inverted = self.invert(value, Rounding::Up);
        self.inner.remove_value(domains, inverted, cause)
    }

    fn update_lower_bound(
        &self,
        domains: &mut DomainsMut<'_>,
        value: i32,
        cause: Cause,
    ) -> DomainResult {
        if self.scale < 0 {
            let inverted = self.invert(value, Rounding::Down);
            self.inner.update_upper_bound(domains, inverted, cause)
        } else {
            let inverted = self.invert(value, Rounding::Up);
            self.inner.update_lower_bound(domains, inverted, cause)
        }
    }

    fn update_upper_bound(
        &self,
        domains: &mut DomainsMut<'_>,
        value: i32,
        cause: Cause,
    ) -> DomainResult {
        if self.scale < 0 {
            let inverted = self.invert(value, Rounding::Up);
            self.inner.update_lower_bound(domains, inverted, cause)
        } else {
            let inverted = self.invert(value, Rounding::Down);
            self.inner.update_upper_bound(domains, inverted, cause)
        }
    }

    fn instantiate_to(&self, domains: &mut DomainsMut<'_>, value: i32, cause: Cause) -> DomainResult {
        if !self.is_image(value) {
            return Err(Contradiction::empty_domain(
                cause,
                self.underlying_domain(),
                DomainMutation::Instantiate(value),
            ));
        }

        let inverted = self.invert(value, Rounding::Up);
        self.inner.instantiate_to(domains, inverted, cause)
    }
}

impl<View: IntegerVariable> EventPublisher for AffineView<View> {
    fn watch_all(&self, watchers: &mut Watchers<'_>, mut events: EnumSet<DomainEvent>) {
        let bound = DomainEvent::LowerBound | DomainEvent::UpperBound;
        let intersection = events.intersection(bound);
        if intersection.len() == 1 && self.scale.is_negative() {
            events = events.symmetrical_difference(bound);
        }
        self.inner.watch_all(watchers, events);
    }

    fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent {
        self.flip_bounds(self.inner.unpack_event(event))
    }
}

impl<View> IntegerVariable for AffineView<View>
where
    View: IntegerVariable,
{
    type AffineView = Self;

    fn underlying_domain(&self) -> DomainId {
        self.inner.underlying_domain()
    }
}

impl<View> TransformableVariable<AffineView<View>> for AffineView<View>
where
    View: IntegerVariable,
{
    fn scaled(&self, scale: i32) -> AffineView<View> {
        let (Some(new_scale), Some(new_offset)) =
            (self.scale.checked_mul(scale), self.offset.checked_mul(scale))
        else {
            panic!(
                "scaling {} * x + {} by {scale} overflows",
                self.scale, self.offset
            );
        };

        AffineView::new(self.inner.clone(), new_scale, new_offset)
    }

    fn offset(&self, offset: i32) -> AffineView<View> {
        let Some(new_offset) = self.offset.checked_add(offset) else {
            panic!("offsetting {} * x + {} by {offset} overflows", self.scale, self.offset);
        };

        AffineView::new(self.inner.clone(), self.scale, new_offset)
    }
}

impl<Var: std::fmt::Debug> std::fmt::Debug for AffineView<Var> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scale == -1 {
            write!(f, "-")?;
        } else if self.scale != 1 {
            write!(f, "{} * ", self.scale)?;
        }

        write!(f, "({:?})", self.inner)?;

        match self.offset.cmp(&0) {
            Ordering::Less => write!(f, " - {}", -self.offset)?,
            Ordering::Equal => {}
            Ordering::Greater => write!(f, " + {}", self.offset)?,
        }

        Ok(())
    }
}

impl From<DomainId> for AffineView<DomainId> {
    fn from(value: DomainId) -> Self {
        AffineView::new(value, 1, 0)
    }
}

enum Rounding {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::notifications::OpaqueDomainEvents;
    use crate::propagation::ReadDomains;
    use crate::state::State;

    #[test]
    fn scaling_an_affine_view() {
        let mut state = State::default();
        let view = AffineView::new(state.new_interval_variable(0, 1, None), 3, 4);
        assert_eq!(3, view.scale);
        assert_eq!(4, view.offset);
        let scaled_view = view.scaled(6);
        assert_eq!(18, scaled_view.scale);
        assert_eq!(24, scaled_view.offset);
    }

    #[test]
    fn offsetting_an_affine_view() {
        let mut state = State::default();
        let view = AffineView::new(state.new_interval_variable(0, 1, None), 3, 4);
        let offset_view = view.offset(6);
        assert_eq!(3, offset_view.scale);
        assert_eq!(10, offset_view.offset);
    }

    #[test]
    fn negating_a_view_twice_gives_back_the_view() {
        let mut state = State::default();
        let view = state.new_interval_variable(2, 6, None).offset(1);
        let negated = view.negated();

        assert_eq!((negated.scale, negated.offset), (-1, -1));
        assert_eq!(negated.negated(), view);
        assert_eq!(state.lower_bound(negated), -7);
        assert_eq!(state.upper_bound(negated), -3);
    }

    #[test]
    #[should_panic(expected = "Multiplication by zero is not invertable")]
    fn scaling_a_view_by_zero_panics() {
        let mut state = State::default();
        let view = state.new_interval_variable(0, 1, None).offset(3);

        let _ = view.scaled(0);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn scaling_a_view_past_the_range_of_the_scale_panics() {
        let mut state = State::default();
        let view = state.new_interval_variable(0, 1, None).scaled(i32::MAX);

        let _ = view.scaled(2);
    }

    #[test]
    fn extreme_bounds_saturate_instead_of_overflowing() {
        let mut state = State::default();
        let domain = state.new_interval_variable(i32::MIN, i32::MAX, None);
        let view = domain.scaled(2).offset(1);

        let domains = state.domains();
        assert_eq!(domains.lower_bound(&view), i32::MIN);
        assert_eq!(domains.upper_bound(&view), i32::MAX);
        assert!(!domains.contains(&view, i32::MIN));
        assert!(domains.contains(&view, i32::MAX));
    }

    #[test]
    fn bounds_are_mapped_through_a_negative_scale() {
        let mut state = State::default();
        let domain = state.new_interval_variable(1, 5, None);
        let view = domain.scaled(-2).offset(1);

        let domains = state.domains();
        assert_eq!(domains.lower_bound(&view), -9);
        assert_eq!(domains.upper_bound(&view), -1);
        assert!(domains.contains(&view, -3));
        assert!(!domains.contains(&view, -4));
        assert_eq!(
            domains.iterate_domain(&view).collect::<Vec<_>>(),
            vec![-1, -3, -5, -7, -9]
        );
    }

    #[test]
    fn bound_updates_round_towards_the_inner_domain() {
        let mut state = State::default();
        let domain = state.new_interval_variable(-10, 10, None);
        let view = domain.scaled(2);

        let _ = state
            .update_lower_bound(view, 3)
            .expect("non-empty domain");
        let _ = state
            .update_upper_bound(view, 11)
            .expect("non-empty domain");

        assert_eq!(state.lower_bound(domain), 2);
        assert_eq!(state.upper_bound(domain), 5);
    }

    #[test]
    fn negated_bound_updates_go_to_the_opposite_bound() {
        let mut state = State::default();
        let domain = state.new_interval_variable(-10, 10, None);
        let view = domain.scaled(-2);

        let _ = state
            .update_lower_bound(view, -5)
            .expect("non-empty domain");
        let _ = state
            .update_upper_bound(view, 5)
            .expect("non-empty domain");

        assert_eq!(state.upper_bound(domain), 2);
        assert_eq!(state.lower_bound(domain), -2);
    }

    #[test]
    fn removing_a_value_outside_the_image_is_a_no_op() {
        let mut state = State::default();
        let domain = state.new_enumerated_variable(0, 3, None);
        let view = domain.scaled(2);

        assert_eq!(state.remove_value(view, 3), Ok(false));
        assert_eq!(state.remove_value(view, 4), Ok(true));
        assert!(!state.contains(domain, 2));
    }

    #[test]
    fn fixing_to_a_value_outside_the_image_is_a_contradiction() {
        let mut state = State::default();
        let domain = state.new_interval_variable(0, 3, None);
        let view = domain.scaled(2);

        let contradiction = state
            .instantiate_to(view, 3)
            .expect_err("3 is not a multiple of 2");

        assert_eq!(contradiction.domain, Some(domain));
        assert_eq!(state.size(domain), 4);
    }

    #[test]
    fn bound_events_are_swapped_for_negative_scales() {
        let mut state = State::default();
        let domain = state.new_interval_variable(0, 3, None);
        let negated = domain.scaled(-1);

        let events = OpaqueDomainEvents::from(DomainEvent::LowerBound | DomainEvent::Assign);

        assert_eq!(
            negated.unpack_events(events),
            DomainEvent::UpperBound | DomainEvent::Assign
        );
        assert_eq!(
            domain.scaled(3).unpack_events(events),
            DomainEvent::LowerBound | DomainEvent::Assign
        );
    }

    #[test]
    fn debug_shows_the_transformation() {
        let mut state = State::default();
        let domain = state.new_interval_variable(0, 3, None);

        assert_eq!(format!("{:?}", domain.scaled(-1).offset(-3)), "-(x0) - 3");
        assert_eq!(format!("{:?}", domain.scaled(2).offset(1)), "2 * (x0) + 1");
    }
}
