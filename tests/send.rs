use anyhow::Result;
use rtp_relay::{
    codec::Error,
    config::Config,
    options::{PacketOptions, apply_packet_options},
};

#[rustfmt::skip]
mod samples {
    pub const RTP_ABS_SEND_TIME: &[u8] = include_bytes!("../crates/codec/tests/samples/RtpAbsSendTime.bin");
    pub const CHANNEL_DATA_RTP: &[u8] = include_bytes!("../crates/codec/tests/samples/ChannelDataRtp.bin");
    pub const SEND_INDICATION_RTP: &[u8] = include_bytes!("../crates/codec/tests/samples/SendIndicationRtp.bin");
    pub const BINDING_REQUEST: &[u8] = include_bytes!("../crates/codec/tests/samples/BindingRequest.bin");
    pub const RTCP_SENDER_REPORT: &[u8] = include_bytes!("../crates/codec/tests/samples/RtcpSenderReport.bin");
}

const AUTH_KEY: [u8; 20] = [
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e,
    0x1f, 0x20, 0x21, 0x22, 0x23,
];

#[rustfmt::skip]
const EXPECTED_TAG: [u8; 10] = [0x89, 0xc5, 0x53, 0x2a, 0xf9, 0xbc, 0xb1, 0x79, 0xf1, 0xec];

fn options() -> Result<PacketOptions> {
    let config: Config = r#"{ sender: { "abs-send-time-extension-id": 3 } }"#.parse()?;

    Ok(config
        .packet_options()
        .with_abs_send_time(3, Some(0x123456))
        .with_auth(AUTH_KEY.to_vec(), config.sender.auth_tag_length, 0x2a))
}

#[test]
fn test_configured_send_over_every_framing() -> Result<()> {
    let options = options()?;

    let mut raw = samples::RTP_ABS_SEND_TIME.to_vec();
    assert!(apply_packet_options(&mut raw, &options)?);
    assert_eq!(&raw[17..20], &[0x12, 0x34, 0x56]);
    assert_eq!(&raw[124..], &EXPECTED_TAG);

    let mut channel_data = samples::CHANNEL_DATA_RTP.to_vec();
    assert!(apply_packet_options(&mut channel_data, &options)?);
    assert_eq!(&channel_data[4..], &raw[..]);

    let mut send_indication = samples::SEND_INDICATION_RTP.to_vec();
    assert!(apply_packet_options(&mut send_indication, &options)?);
    assert_eq!(&send_indication[36..170], &raw[..]);
    assert_eq!(&send_indication[170..], &samples::SEND_INDICATION_RTP[170..]);

    Ok(())
}

#[test]
fn test_non_rtp_is_forwarded_untouched() -> Result<()> {
    let options = options()?;

    let mut binding = samples::BINDING_REQUEST.to_vec();
    assert_eq!(apply_packet_options(&mut binding, &options), Err(Error::NotRtpLike));
    assert_eq!(binding, samples::BINDING_REQUEST);

    let mut rtcp = samples::RTCP_SENDER_REPORT.to_vec();
    assert_eq!(apply_packet_options(&mut rtcp, &options), Err(Error::NotRtpLike));
    assert_eq!(rtcp, samples::RTCP_SENDER_REPORT);

    Ok(())
}

#[test]
fn test_wall_clock_abs_send_time() -> Result<()> {
    let config: Config = r#"{ sender: { "abs-send-time-extension-id": 3 } }"#.parse()?;
    let mut raw = samples::RTP_ABS_SEND_TIME.to_vec();

    assert!(apply_packet_options(&mut raw, &config.packet_options())?);
    assert_eq!(&raw[..17], &samples::RTP_ABS_SEND_TIME[..17]);
    assert_eq!(&raw[20..], &samples::RTP_ABS_SEND_TIME[20..]);

    Ok(())
}
