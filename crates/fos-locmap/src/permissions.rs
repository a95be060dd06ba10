//! Location permissions
//!
//! Capabilities the controller needs and the gateway that grants them.

/// Location capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    FineLocation,
    CoarseLocation,
}

impl Capability {
    /// Both location capabilities, in request order
    pub const ALL: [Capability; 2] = [Self::FineLocation, Self::CoarseLocation];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fine-location" => Some(Self::FineLocation),
            "coarse-location" => Some(Self::CoarseLocation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FineLocation => "fine-location",
            Self::CoarseLocation => "coarse-location",
        }
    }
}

/// Correlation id for a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestCode(pub u32);

impl RequestCode {
    pub const LOCATION: RequestCode = RequestCode(101);
}

/// Grant state of both capabilities, read fresh from the gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionState {
    pub fine: bool,
    pub coarse: bool,
}

impl PermissionState {
    /// Read the current state from a gateway
    pub fn query<G: PermissionGateway + ?Sized>(gateway: &G) -> Self {
        Self {
            fine: gateway.check(Capability::FineLocation),
            coarse: gateway.check(Capability::CoarseLocation),
        }
    }

    /// At least one capability granted
    pub fn any(&self) -> bool {
        self.fine || self.coarse
    }

    /// Both capabilities granted
    pub fn all(&self) -> bool {
        self.fine && self.coarse
    }

    /// Interpret a grant vector ordered like [`Capability::ALL`].
    /// A short vector counts the missing entries as denied.
    pub fn from_grants(granted: &[bool]) -> Self {
        Self {
            fine: granted.first().copied().unwrap_or(false),
            coarse: granted.get(1).copied().unwrap_or(false),
        }
    }
}

/// Platform facility that reports and grants capabilities
pub trait PermissionGateway {
    /// Synchronous local read of one capability
    fn check(&self, capability: Capability) -> bool;

    /// Ask for capabilities. The result arrives later through
    /// `LocationMapController::on_permission_result` with the same `code`.
    fn request(&mut self, capabilities: &[Capability], code: RequestCode);
}
