use crate::Error;

/// STUN message classes.
///
/// [RFC8489]: https://datatracker.ietf.org/doc/html/rfc8489#section-5
///
/// The class indicates whether this is a request, a success response, an
/// error response, or an indication [RFC8489].  Indications carry no class
/// here, they are modelled as their own message types.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum MessageClass {
    Request,
    Response,
    Error,
}

/// STUN and TURN message types recognised on the relay path.
///
/// [RFC3489]: https://datatracker.ietf.org/doc/html/rfc3489
/// [RFC8489]: https://datatracker.ietf.org/doc/html/rfc8489
/// [RFC8656]: https://datatracker.ietf.org/doc/html/rfc8656
///
/// Besides the methods of [RFC8489] and [RFC8656] this also covers the
/// SharedSecret method of [RFC3489] and the Send/Data methods of the early
/// TURN drafts, which some relays still emit.  Any other type code is not
/// treated as STUN at all.
///
/// 0x001: Binding
/// 0x002: SharedSecret
/// 0x003: Allocate
/// 0x004: Send (legacy)
/// 0x006: Send Indication
/// 0x007: Data Indication
/// 0x009: ChannelBind
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum StunMessageType {
    Binding(MessageClass),
    SharedSecret(MessageClass),
    Allocate(MessageClass),
    Send(MessageClass),
    ChannelBind(MessageClass),
    BindingIndication,
    /// Legacy data indication, `0x0115`.
    DataIndication,
    TurnSendIndication,
    TurnDataIndication,
}

pub const BINDING_REQUEST: StunMessageType = StunMessageType::Binding(MessageClass::Request);
pub const BINDING_RESPONSE: StunMessageType = StunMessageType::Binding(MessageClass::Response);
pub const BINDING_ERROR: StunMessageType = StunMessageType::Binding(MessageClass::Error);
pub const SHARED_SECRET_REQUEST: StunMessageType = StunMessageType::SharedSecret(MessageClass::Request);
pub const SHARED_SECRET_RESPONSE: StunMessageType = StunMessageType::SharedSecret(MessageClass::Response);
pub const SHARED_SECRET_ERROR: StunMessageType = StunMessageType::SharedSecret(MessageClass::Error);
pub const ALLOCATE_REQUEST: StunMessageType = StunMessageType::Allocate(MessageClass::Request);
pub const ALLOCATE_RESPONSE: StunMessageType = StunMessageType::Allocate(MessageClass::Response);
pub const ALLOCATE_ERROR: StunMessageType = StunMessageType::Allocate(MessageClass::Error);
pub const SEND_REQUEST: StunMessageType = StunMessageType::Send(MessageClass::Request);
pub const SEND_RESPONSE: StunMessageType = StunMessageType::Send(MessageClass::Response);
pub const SEND_ERROR: StunMessageType = StunMessageType::Send(MessageClass::Error);
pub const CHANNEL_BIND_REQUEST: StunMessageType = StunMessageType::ChannelBind(MessageClass::Request);
pub const CHANNEL_BIND_RESPONSE: StunMessageType = StunMessageType::ChannelBind(MessageClass::Response);
pub const CHANNEL_BIND_ERROR: StunMessageType = StunMessageType::ChannelBind(MessageClass::Error);
pub const BINDING_INDICATION: StunMessageType = StunMessageType::BindingIndication;
pub const DATA_INDICATION: StunMessageType = StunMessageType::DataIndication;
pub const TURN_SEND_INDICATION: StunMessageType = StunMessageType::TurnSendIndication;
pub const TURN_DATA_INDICATION: StunMessageType = StunMessageType::TurnDataIndication;

/// Every recognised message type, in wire-code order of method.
pub const ALL: [StunMessageType; 19] = [
    BINDING_REQUEST,
    BINDING_INDICATION,
    BINDING_RESPONSE,
    BINDING_ERROR,
    SHARED_SECRET_REQUEST,
    SHARED_SECRET_RESPONSE,
    SHARED_SECRET_ERROR,
    ALLOCATE_REQUEST,
    ALLOCATE_RESPONSE,
    ALLOCATE_ERROR,
    SEND_REQUEST,
    SEND_RESPONSE,
    SEND_ERROR,
    DATA_INDICATION,
    TURN_SEND_INDICATION,
    TURN_DATA_INDICATION,
    CHANNEL_BIND_REQUEST,
    CHANNEL_BIND_RESPONSE,
    CHANNEL_BIND_ERROR,
];

impl StunMessageType {
    /// Whether a transaction carrying this message is still "connecting".
    ///
    /// Only binding and allocate requests and their success responses
    /// qualify, everything else is either terminal or not part of a
    /// connectivity transaction.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::stun::methods::*;
    ///
    /// assert!(BINDING_REQUEST.is_request_or_response());
    /// assert!(ALLOCATE_RESPONSE.is_request_or_response());
    /// assert!(!BINDING_ERROR.is_request_or_response());
    /// assert!(!CHANNEL_BIND_REQUEST.is_request_or_response());
    /// assert!(!TURN_SEND_INDICATION.is_request_or_response());
    /// ```
    pub fn is_request_or_response(&self) -> bool {
        matches!(
            self,
            Self::Binding(MessageClass::Request | MessageClass::Response)
                | Self::Allocate(MessageClass::Request | MessageClass::Response)
        )
    }

    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::stun::methods::*;
    ///
    /// assert!(BINDING_ERROR.is_error());
    /// assert!(CHANNEL_BIND_ERROR.is_error());
    /// assert!(!ALLOCATE_RESPONSE.is_error());
    /// assert!(!TURN_DATA_INDICATION.is_error());
    /// ```
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Binding(MessageClass::Error)
                | Self::SharedSecret(MessageClass::Error)
                | Self::Allocate(MessageClass::Error)
                | Self::Send(MessageClass::Error)
                | Self::ChannelBind(MessageClass::Error)
        )
    }

    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::stun::methods::*;
    ///
    /// assert!(BINDING_INDICATION.is_indication());
    /// assert!(DATA_INDICATION.is_indication());
    /// assert!(TURN_SEND_INDICATION.is_indication());
    /// assert!(!SEND_REQUEST.is_indication());
    /// ```
    pub fn is_indication(&self) -> bool {
        matches!(
            self,
            Self::BindingIndication
                | Self::DataIndication
                | Self::TurnSendIndication
                | Self::TurnDataIndication
        )
    }
}

impl TryFrom<u16> for StunMessageType {
    type Error = Error;

    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::stun::methods::*;
    /// use std::convert::TryFrom;
    ///
    /// assert_eq!(StunMessageType::try_from(0x0001).unwrap(), BINDING_REQUEST);
    /// assert_eq!(StunMessageType::try_from(0x0011).unwrap(), BINDING_INDICATION);
    /// assert_eq!(StunMessageType::try_from(0x0112).unwrap(), SHARED_SECRET_ERROR);
    /// assert_eq!(StunMessageType::try_from(0x0104).unwrap(), SEND_RESPONSE);
    /// assert_eq!(StunMessageType::try_from(0x0115).unwrap(), DATA_INDICATION);
    /// assert_eq!(StunMessageType::try_from(0x0016).unwrap(), TURN_SEND_INDICATION);
    /// assert_eq!(StunMessageType::try_from(0x0119).unwrap(), CHANNEL_BIND_ERROR);
    /// assert!(StunMessageType::try_from(0x0008).is_err());
    /// ```
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            0x0001 => Self::Binding(MessageClass::Request),
            0x0101 => Self::Binding(MessageClass::Response),
            0x0111 => Self::Binding(MessageClass::Error),
            0x0011 => Self::BindingIndication,
            0x0002 => Self::SharedSecret(MessageClass::Request),
            0x0102 => Self::SharedSecret(MessageClass::Response),
            0x0112 => Self::SharedSecret(MessageClass::Error),
            0x0003 => Self::Allocate(MessageClass::Request),
            0x0103 => Self::Allocate(MessageClass::Response),
            0x0113 => Self::Allocate(MessageClass::Error),
            0x0004 => Self::Send(MessageClass::Request),
            0x0104 => Self::Send(MessageClass::Response),
            0x0114 => Self::Send(MessageClass::Error),
            0x0115 => Self::DataIndication,
            0x0016 => Self::TurnSendIndication,
            0x0017 => Self::TurnDataIndication,
            0x0009 => Self::ChannelBind(MessageClass::Request),
            0x0109 => Self::ChannelBind(MessageClass::Response),
            0x0119 => Self::ChannelBind(MessageClass::Error),
            _ => return Err(Error::UnknownMethod),
        })
    }
}

impl From<StunMessageType> for u16 {
    fn from(value: StunMessageType) -> Self {
        match value {
            StunMessageType::Binding(MessageClass::Request) => 0x0001,
            StunMessageType::Binding(MessageClass::Response) => 0x0101,
            StunMessageType::Binding(MessageClass::Error) => 0x0111,
            StunMessageType::BindingIndication => 0x0011,
            StunMessageType::SharedSecret(MessageClass::Request) => 0x0002,
            StunMessageType::SharedSecret(MessageClass::Response) => 0x0102,
            StunMessageType::SharedSecret(MessageClass::Error) => 0x0112,
            StunMessageType::Allocate(MessageClass::Request) => 0x0003,
            StunMessageType::Allocate(MessageClass::Response) => 0x0103,
            StunMessageType::Allocate(MessageClass::Error) => 0x0113,
            StunMessageType::Send(MessageClass::Request) => 0x0004,
            StunMessageType::Send(MessageClass::Response) => 0x0104,
            StunMessageType::Send(MessageClass::Error) => 0x0114,
            StunMessageType::DataIndication => 0x0115,
            StunMessageType::TurnSendIndication => 0x0016,
            StunMessageType::TurnDataIndication => 0x0017,
            StunMessageType::ChannelBind(MessageClass::Request) => 0x0009,
            StunMessageType::ChannelBind(MessageClass::Response) => 0x0109,
            StunMessageType::ChannelBind(MessageClass::Error) => 0x0119,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_survives_its_wire_code() {
        for kind in ALL {
            let code: u16 = kind.into();
            assert_eq!(StunMessageType::try_from(code), Ok(kind));
        }
    }

    #[test]
    fn only_four_types_are_connecting() {
        let connecting = ALL
            .iter()
            .filter(|it| it.is_request_or_response())
            .count();

        assert_eq!(connecting, 4);
    }

    #[test]
    fn every_type_is_exactly_one_kind() {
        assert_eq!(ALL.len(), 19);

        for kind in ALL {
            let kinds = [kind.is_request_or_response(), kind.is_error(), kind.is_indication()];
            assert!(kinds.iter().filter(|it| **it).count() <= 1, "{:?}", kind);
        }

        assert_eq!(ALL.iter().filter(|it| it.is_error()).count(), 5);
        assert_eq!(ALL.iter().filter(|it| it.is_indication()).count(), 4);
        assert_eq!(StunMessageType::try_from(0x0011), Ok(BINDING_INDICATION));
    }

    #[test]
    fn create_permission_and_unassigned_codes_are_not_recognised() {
        for code in [0x0008u16, 0x0108, 0x0118, 0x0000, 0xffff, 0x0105] {
            assert_eq!(StunMessageType::try_from(code), Err(Error::UnknownMethod));
        }
    }
}
