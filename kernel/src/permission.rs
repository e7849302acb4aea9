use crate::model::{actor::Actor, id::UserId, role::Role};
use shared::error::{AppError, AppResult};

/// Everything a caller may ask the core to do. Store-access
/// operations consult `can_act` with one of these instead of
/// scattering role comparisons across call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, update or soft-delete offices.
    OfficeAdmin,
    /// Register staff accounts.
    UserAdmin,
    /// Create, update or delete availability windows of an office.
    AvailabilityWrite,
    /// Request a booking. Explicitly public.
    BookingCreate,
    /// REQUESTED -> CONFIRMED.
    BookingConfirm,
    /// REQUESTED/CONFIRMED -> CANCELLED. Visitors cancelling their own
    /// booking are matched by email separately, not through a role.
    BookingCancel,
    /// REQUESTED/CONFIRMED -> COMPLETED.
    BookingComplete,
    /// See the full booking projection and edit non-status fields.
    BookingListFull,
}

/// Pure allow/deny decision for a (role, identity, resource-ownership)
/// tuple. `resource_owner_ids` are the owners of the office the
/// operation is scoped to; they only matter for `OfficeOwner` callers.
pub fn can_act(
    role: Option<Role>,
    identity: Option<UserId>,
    resource_owner_ids: &[UserId],
    capability: Capability,
) -> bool {
    use Capability::*;
    match role {
        Some(Role::Admin) => true,
        Some(Role::Attendant) => matches!(
            capability,
            BookingCreate | BookingConfirm | BookingCancel | BookingComplete | BookingListFull
        ),
        Some(Role::OfficeOwner) => match capability {
            BookingCreate => true,
            AvailabilityWrite | BookingConfirm | BookingCancel | BookingListFull => {
                identity.is_some_and(|id| resource_owner_ids.contains(&id))
            }
            OfficeAdmin | UserAdmin | BookingComplete => false,
        },
        None => matches!(capability, BookingCreate),
    }
}

/// `can_act` lifted to an `Actor`, failing with `Forbidden`.
pub fn ensure(actor: &Actor, resource_owner_ids: &[UserId], capability: Capability) -> AppResult<()> {
    if can_act(actor.role, actor.user_id, resource_owner_ids, capability) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you are not allowed to perform this operation".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_every_capability() {
        let caps = [
            Capability::OfficeAdmin,
            Capability::UserAdmin,
            Capability::AvailabilityWrite,
            Capability::BookingCreate,
            Capability::BookingConfirm,
            Capability::BookingCancel,
            Capability::BookingComplete,
            Capability::BookingListFull,
        ];
        for cap in caps {
            assert!(can_act(Some(Role::Admin), Some(UserId::new()), &[], cap));
        }
    }

    #[test]
    fn attendant_manages_bookings_but_not_offices() {
        let id = Some(UserId::new());
        assert!(can_act(Some(Role::Attendant), id, &[], Capability::BookingConfirm));
        assert!(can_act(Some(Role::Attendant), id, &[], Capability::BookingComplete));
        assert!(!can_act(Some(Role::Attendant), id, &[], Capability::OfficeAdmin));
        assert!(!can_act(Some(Role::Attendant), id, &[], Capability::AvailabilityWrite));
    }

    #[test]
    fn office_owner_needs_to_own_the_resource() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let owners = vec![owner];
        assert!(can_act(
            Some(Role::OfficeOwner),
            Some(owner),
            &owners,
            Capability::AvailabilityWrite
        ));
        assert!(!can_act(
            Some(Role::OfficeOwner),
            Some(stranger),
            &owners,
            Capability::AvailabilityWrite
        ));
        assert!(!can_act(
            Some(Role::OfficeOwner),
            Some(owner),
            &owners,
            Capability::BookingComplete
        ));
    }

    #[test]
    fn only_admins_register_user_accounts() {
        let id = Some(UserId::new());
        assert!(can_act(Some(Role::Admin), id, &[], Capability::UserAdmin));
        assert!(!can_act(Some(Role::Attendant), id, &[], Capability::UserAdmin));
        assert!(!can_act(Some(Role::OfficeOwner), id, &[id.unwrap()], Capability::UserAdmin));
        assert!(!can_act(None, None, &[], Capability::UserAdmin));
    }

    #[test]
    fn anonymous_callers_only_create_bookings() {
        assert!(can_act(None, None, &[], Capability::BookingCreate));
        assert!(!can_act(None, None, &[], Capability::BookingCancel));
        assert!(!can_act(None, None, &[], Capability::BookingListFull));
    }
}
