use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    AccessCatalog,
    RequestSongs,
    RateAndFavorite,
    EditCatalog,
    ManageProfiles,
    BypassRequestLimits,
    ControlPlayback,
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::AccessCatalog,
    Permission::RequestSongs,
    Permission::RateAndFavorite,
    Permission::EditCatalog,
    Permission::ManageProfiles,
    Permission::BypassRequestLimits,
];
const LISTENER_PERMISSIONS: &[Permission] = &[
    Permission::AccessCatalog,
    Permission::RequestSongs,
    Permission::RateAndFavorite,
];
// The DJ account drives playback and nothing else.
const DJ_PERMISSIONS: &[Permission] = &[
    Permission::AccessCatalog,
    Permission::RequestSongs,
    Permission::ControlPlayback,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UserRole {
    Admin,
    Listener,
    Dj,
}

impl UserRole {
    /// The DJ flag wins over the staff flag.
    pub fn from_flags(is_staff: bool, is_dj: bool) -> Self {
        match (is_staff, is_dj) {
            (_, true) => UserRole::Dj,
            (true, false) => UserRole::Admin,
            (false, false) => UserRole::Listener,
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            UserRole::Admin => ADMIN_PERMISSIONS,
            UserRole::Listener => LISTENER_PERMISSIONS,
            UserRole::Dj => DJ_PERMISSIONS,
        }
    }

    /// Permissions of a user with these flags. Staff keep their exemption from
    /// request limits whatever their role.
    pub fn permissions_for(is_staff: bool, is_dj: bool) -> Vec<Permission> {
        let mut permissions = Self::from_flags(is_staff, is_dj).permissions().to_vec();
        if is_staff && !permissions.contains(&Permission::BypassRequestLimits) {
            permissions.push(Permission::BypassRequestLimits);
        }
        permissions
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Listener => "Listener",
            UserRole::Dj => "DJ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_flags() {
        assert_eq!(UserRole::from_flags(false, false), UserRole::Listener);
        assert_eq!(UserRole::from_flags(true, false), UserRole::Admin);
        assert_eq!(UserRole::from_flags(false, true), UserRole::Dj);
        assert_eq!(UserRole::from_flags(true, true), UserRole::Dj);
    }

    #[test]
    fn staff_dj_keeps_request_exemption() {
        let perms = UserRole::permissions_for(true, true);
        assert!(perms.contains(&Permission::ControlPlayback));
        assert!(perms.contains(&Permission::BypassRequestLimits));
        assert!(!perms.contains(&Permission::EditCatalog));

        assert!(!UserRole::permissions_for(false, true)
            .contains(&Permission::BypassRequestLimits));
        assert_eq!(
            UserRole::permissions_for(true, false),
            UserRole::Admin.permissions().to_vec()
        );
    }

    #[test]
    fn admin_can_edit_but_not_play() {
        let perms = UserRole::Admin.permissions();
        assert!(perms.contains(&Permission::EditCatalog));
        assert!(perms.contains(&Permission::BypassRequestLimits));
        assert!(!perms.contains(&Permission::ControlPlayback));
    }

    #[test]
    fn listener_permissions() {
        let perms = UserRole::Listener.permissions();
        assert!(perms.contains(&Permission::RequestSongs));
        assert!(perms.contains(&Permission::RateAndFavorite));
        assert!(!perms.contains(&Permission::EditCatalog));
        assert!(!perms.contains(&Permission::BypassRequestLimits));
    }

    #[test]
    fn dj_cannot_edit_or_rate() {
        let perms = UserRole::Dj.permissions();
        assert!(perms.contains(&Permission::ControlPlayback));
        assert!(!perms.contains(&Permission::EditCatalog));
        assert!(!perms.contains(&Permission::RateAndFavorite));
        assert!(!perms.contains(&Permission::ManageProfiles));
    }

    #[test]
    fn role_names() {
        assert_eq!(UserRole::Admin.as_str(), "Admin");
        assert_eq!(UserRole::Dj.as_str(), "DJ");
    }
}
