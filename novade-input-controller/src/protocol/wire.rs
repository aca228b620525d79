//! Wayland wire framing for the `ivi_input` interface.
//!
//! Every message starts with an 8-byte header: the object id, then a word
//! holding the opcode in the upper 16 bits and the total message size
//! (header included) in the lower 16 bits. Arguments follow, each padded to
//! 4 bytes. All integers are native endian.
//!
//! | dir | opcode | message | arguments |
//! |---|---|---|---|
//! | request | 0 | `set_input_focus` | uint surface, uint device, int enabled |
//! | request | 1 | `set_input_acceptance` | uint surface, string seat, int accepted |
//! | event | 0 | `seat_capabilities` | string seat, uint caps |
//! | event | 1 | `seat_created` | string seat, uint caps |
//! | event | 2 | `seat_destroyed` | string seat |
//! | event | 3 | `input_focus` | uint surface, uint device, int enabled |
//! | event | 4 | `input_acceptance` | uint surface, string seat, int accepted |

use byteorder::{ByteOrder, NativeEndian};
use std::cell::RefCell;
use std::rc::Rc;

use crate::broadcast::ControllerClient;
use crate::device::DeviceClass;
use crate::error::WireError;
use crate::host::SurfaceId;
use crate::protocol::{ControllerEvent, ControllerRequest};

pub const REQ_SET_INPUT_FOCUS: u16 = 0;
pub const REQ_SET_INPUT_ACCEPTANCE: u16 = 1;

pub const EVT_SEAT_CAPABILITIES: u16 = 0;
pub const EVT_SEAT_CREATED: u16 = 1;
pub const EVT_SEAT_DESTROYED: u16 = 2;
pub const EVT_INPUT_FOCUS: u16 = 3;
pub const EVT_INPUT_ACCEPTANCE: u16 = 4;

pub const HEADER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub object_id: u32,
    pub opcode: u16,
    /// Total length in bytes, header included.
    pub size: u16,
}

/// A decoded message together with the object it was addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framed<T> {
    pub object_id: u32,
    pub message: T,
    /// Bytes consumed from the input buffer.
    pub size: usize,
}

/// Parses the 8-byte message header.
pub fn parse_header(bytes: &[u8]) -> Result<MessageHeader, WireError> {
    if bytes.len() < HEADER_SIZE {
        return Err(WireError::NotEnoughData(format!(
            "Need {} bytes for header, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }
    let object_id = NativeEndian::read_u32(&bytes[0..4]);
    let opcode_size = NativeEndian::read_u32(&bytes[4..8]);
    let opcode = (opcode_size >> 16) as u16;
    let size = (opcode_size & 0xFFFF) as u16;

    if (size as usize) < HEADER_SIZE || size % 4 != 0 {
        return Err(WireError::InvalidHeader(format!(
            "Message size {} is not a 4-byte aligned length of at least {}",
            size, HEADER_SIZE
        )));
    }
    Ok(MessageHeader { object_id, opcode, size })
}

// Argument deserialisation. Each helper consumes from the front of `bytes`.

fn read_u32(bytes: &mut &[u8]) -> Result<u32, WireError> {
    if bytes.len() < 4 {
        return Err(WireError::NotEnoughData("Need 4 bytes for u32".to_string()));
    }
    let val = NativeEndian::read_u32(*bytes);
    *bytes = &bytes[4..];
    Ok(val)
}

fn read_i32(bytes: &mut &[u8]) -> Result<i32, WireError> {
    if bytes.len() < 4 {
        return Err(WireError::NotEnoughData("Need 4 bytes for i32".to_string()));
    }
    let val = NativeEndian::read_i32(*bytes);
    *bytes = &bytes[4..];
    Ok(val)
}

/// Protocol booleans travel as `int`; anything non-zero is true.
fn read_bool(bytes: &mut &[u8]) -> Result<bool, WireError> {
    read_i32(bytes).map(|v| v != 0)
}

fn read_string(bytes: &mut &[u8]) -> Result<String, WireError> {
    let len = read_u32(bytes)? as usize;
    if len == 0 {
        return Err(WireError::InvalidArgument("String length cannot be 0".to_string()));
    }
    let padded_len = (len + 3) & !3;
    if bytes.len() < padded_len {
        return Err(WireError::NotEnoughData(format!(
            "Need {} bytes for string content, got {}",
            padded_len,
            bytes.len()
        )));
    }

    let s = std::ffi::CStr::from_bytes_with_nul(&bytes[..len])
        .map_err(|e| WireError::InvalidArgument(format!("Invalid C string: {}", e)))?
        .to_str()
        .map_err(|e| WireError::InvalidArgument(format!("Invalid UTF-8 string: {}", e)))?
        .to_string();

    *bytes = &bytes[padded_len..];
    Ok(s)
}

// Serialisation.

fn write_u32(out: &mut Vec<u8>, val: u32) {
    let mut buf = [0u8; 4];
    NativeEndian::write_u32(&mut buf, val);
    out.extend_from_slice(&buf);
}

fn write_i32(out: &mut Vec<u8>, val: i32) {
    let mut buf = [0u8; 4];
    NativeEndian::write_i32(&mut buf, val);
    out.extend_from_slice(&buf);
}

fn write_bool(out: &mut Vec<u8>, val: bool) {
    write_i32(out, i32::from(val));
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    let len = s.len() + 1; // NUL terminator
    write_u32(out, len as u32);
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    let padding = ((len + 3) & !3) - len;
    out.extend(std::iter::repeat(0u8).take(padding));
}

/// Writes header + body, patching the size once the body length is known.
fn write_message(
    out: &mut Vec<u8>,
    object_id: u32,
    opcode: u16,
    body: impl FnOnce(&mut Vec<u8>),
) -> Result<(), WireError> {
    let start = out.len();
    write_u32(out, object_id);
    write_u32(out, 0); // opcode/size placeholder
    body(out);

    let size = out.len() - start;
    if size > u16::MAX as usize {
        out.truncate(start);
        return Err(WireError::InvalidArgument(format!(
            "Message of {} bytes exceeds the wire size limit",
            size
        )));
    }
    NativeEndian::write_u32(&mut out[start + 4..start + 8], (u32::from(opcode) << 16) | size as u32);
    Ok(())
}

/// Splits one framed message off the front of `bytes`, returning the header
/// and the argument bytes.
fn split_frame(bytes: &[u8]) -> Result<(MessageHeader, &[u8]), WireError> {
    let header = parse_header(bytes)?;
    let size = header.size as usize;
    if bytes.len() < size {
        return Err(WireError::NotEnoughData(format!(
            "Header announces {} bytes, only {} available",
            size,
            bytes.len()
        )));
    }
    Ok((header, &bytes[HEADER_SIZE..size]))
}

fn ensure_consumed(args: &[u8], opcode: u16) -> Result<(), WireError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(WireError::InvalidArgument(format!(
            "{} trailing bytes after arguments of opcode {}",
            args.len(),
            opcode
        )))
    }
}

/// Decodes one request from the front of `bytes`.
pub fn decode_request(bytes: &[u8]) -> Result<Framed<ControllerRequest>, WireError> {
    let (header, mut args) = split_frame(bytes)?;
    let request = match header.opcode {
        REQ_SET_INPUT_FOCUS => ControllerRequest::SetInputFocus {
            surface: SurfaceId(read_u32(&mut args)?),
            devices: DeviceClass::from_wire(read_u32(&mut args)?),
            enabled: read_bool(&mut args)?,
        },
        REQ_SET_INPUT_ACCEPTANCE => ControllerRequest::SetInputAcceptance {
            surface: SurfaceId(read_u32(&mut args)?),
            seat: read_string(&mut args)?,
            accepted: read_bool(&mut args)?,
        },
        other => return Err(WireError::UnsupportedOpcode(other)),
    };
    ensure_consumed(args, header.opcode)?;
    Ok(Framed { object_id: header.object_id, message: request, size: header.size as usize })
}

/// Decodes one event from the front of `bytes` (the client side of the codec).
pub fn decode_event(bytes: &[u8]) -> Result<Framed<ControllerEvent>, WireError> {
    let (header, mut args) = split_frame(bytes)?;
    let event = match header.opcode {
        EVT_SEAT_CAPABILITIES => ControllerEvent::SeatCapabilities {
            seat: read_string(&mut args)?,
            capabilities: DeviceClass::from_wire(read_u32(&mut args)?),
        },
        EVT_SEAT_CREATED => ControllerEvent::SeatCreated {
            seat: read_string(&mut args)?,
            capabilities: DeviceClass::from_wire(read_u32(&mut args)?),
        },
        EVT_SEAT_DESTROYED => ControllerEvent::SeatDestroyed { seat: read_string(&mut args)? },
        EVT_INPUT_FOCUS => ControllerEvent::InputFocus {
            surface: SurfaceId(read_u32(&mut args)?),
            devices: DeviceClass::from_wire(read_u32(&mut args)?),
            enabled: read_bool(&mut args)?,
        },
        EVT_INPUT_ACCEPTANCE => ControllerEvent::InputAcceptance {
            surface: SurfaceId(read_u32(&mut args)?),
            seat: read_string(&mut args)?,
            accepted: read_bool(&mut args)?,
        },
        other => return Err(WireError::UnsupportedOpcode(other)),
    };
    ensure_consumed(args, header.opcode)?;
    Ok(Framed { object_id: header.object_id, message: event, size: header.size as usize })
}

/// Appends `event`, addressed to `object_id`, to `out`.
pub fn encode_event(out: &mut Vec<u8>, object_id: u32, event: &ControllerEvent) -> Result<(), WireError> {
    write_message(out, object_id, event.opcode(), |out| match event {
        ControllerEvent::SeatCapabilities { seat, capabilities }
        | ControllerEvent::SeatCreated { seat, capabilities } => {
            write_string(out, seat);
            write_u32(out, capabilities.bits());
        }
        ControllerEvent::SeatDestroyed { seat } => write_string(out, seat),
        ControllerEvent::InputFocus { surface, devices, enabled } => {
            write_u32(out, surface.0);
            write_u32(out, devices.bits());
            write_bool(out, *enabled);
        }
        ControllerEvent::InputAcceptance { surface, seat, accepted } => {
            write_u32(out, surface.0);
            write_string(out, seat);
            write_bool(out, *accepted);
        }
    })
}

/// Appends `request`, addressed to `object_id`, to `out`.
pub fn encode_request(out: &mut Vec<u8>, object_id: u32, request: &ControllerRequest) -> Result<(), WireError> {
    write_message(out, object_id, request.opcode(), |out| match request {
        ControllerRequest::SetInputFocus { surface, devices, enabled } => {
            write_u32(out, surface.0);
            write_u32(out, devices.bits());
            write_bool(out, *enabled);
        }
        ControllerRequest::SetInputAcceptance { surface, seat, accepted } => {
            write_u32(out, surface.0);
            write_string(out, seat);
            write_bool(out, *accepted);
        }
    })
}

/// Host-side reader for the bytes a [`WireClient`] has queued.
#[derive(Debug, Clone, Default)]
pub struct WireOutbox {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl WireOutbox {
    /// Takes everything queued so far, leaving the outbox empty.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buffer.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A control client whose events are encoded into an outgoing byte queue,
/// ready for the host transport to flush to the connection.
#[derive(Debug)]
pub struct WireClient {
    object_id: u32,
    outbox: WireOutbox,
}

impl WireClient {
    /// `object_id` is the id the client chose for its `ivi_input` resource.
    pub fn new(object_id: u32) -> (Self, WireOutbox) {
        let outbox = WireOutbox::default();
        (Self { object_id, outbox: outbox.clone() }, outbox)
    }

    pub fn object_id(&self) -> u32 {
        self.object_id
    }
}

impl ControllerClient for WireClient {
    fn send(&mut self, event: &ControllerEvent) {
        let mut buffer = self.outbox.buffer.borrow_mut();
        if let Err(e) = encode_event(&mut buffer, self.object_id, event) {
            tracing::error!("Dropping event {:?} for object {}: {}", event, self.object_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn focus_request_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        encode_request(
            &mut out,
            3,
            &ControllerRequest::SetInputFocus {
                surface: SurfaceId(42),
                devices: DeviceClass::POINTER,
                enabled: true,
            },
        )
        .unwrap();
        out
    }

    #[test]
    fn test_focus_request_layout() {
        let bytes = focus_request_bytes();
        assert_eq!(bytes.len(), 20);
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header, MessageHeader { object_id: 3, opcode: REQ_SET_INPUT_FOCUS, size: 20 });
        assert_eq!(NativeEndian::read_u32(&bytes[8..12]), 42);
        assert_eq!(NativeEndian::read_u32(&bytes[12..16]), 2);
        assert_eq!(NativeEndian::read_i32(&bytes[16..20]), 1);
    }

    #[test]
    fn test_string_padding() {
        // "default" + NUL = 8 bytes, already aligned; "seat0" + NUL = 6 -> 8.
        let mut out = Vec::new();
        write_string(&mut out, "seat0");
        assert_eq!(out.len(), 4 + 8);
        assert_eq!(&out[4..10], b"seat0\0");
        assert_eq!(&out[10..12], &[0, 0]);

        let mut slice: &[u8] = &out;
        assert_eq!(read_string(&mut slice).unwrap(), "seat0");
        assert!(slice.is_empty());
    }

    #[test]
    fn test_nonzero_int_decodes_as_true() {
        let mut bytes = focus_request_bytes();
        NativeEndian::write_i32(&mut bytes[16..20], -5);
        match decode_request(&bytes).unwrap().message {
            ControllerRequest::SetInputFocus { enabled, .. } => assert!(enabled),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_acceptance_request_decodes() {
        let mut out = Vec::new();
        let request = ControllerRequest::SetInputAcceptance {
            surface: SurfaceId(7),
            seat: "seat1".to_string(),
            accepted: false,
        };
        encode_request(&mut out, 9, &request).unwrap();
        let framed = decode_request(&out).unwrap();
        assert_eq!(framed, Framed { object_id: 9, message: request, size: out.len() });
    }

    #[test]
    fn test_truncated_frame_is_rejected() {
        let bytes = focus_request_bytes();
        assert!(matches!(decode_request(&bytes[..12]), Err(WireError::NotEnoughData(_))));
        assert!(matches!(parse_header(&bytes[..4]), Err(WireError::NotEnoughData(_))));
    }

    #[test]
    fn test_unknown_opcode_is_rejected() {
        let mut bytes = focus_request_bytes();
        NativeEndian::write_u32(&mut bytes[4..8], (7u32 << 16) | 20);
        assert_eq!(decode_request(&bytes), Err(WireError::UnsupportedOpcode(7)));
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut bytes = focus_request_bytes();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        NativeEndian::write_u32(&mut bytes[4..8], 24);
        assert!(matches!(decode_request(&bytes), Err(WireError::InvalidArgument(_))));
    }

    #[test]
    fn test_misaligned_size_is_rejected() {
        let mut bytes = focus_request_bytes();
        NativeEndian::write_u32(&mut bytes[4..8], 18);
        assert!(matches!(parse_header(&bytes), Err(WireError::InvalidHeader(_))));
    }

    #[test]
    fn test_wire_client_queues_events() {
        let (mut client, outbox) = WireClient::new(5);
        client.send(&ControllerEvent::SeatDestroyed { seat: "seat0".to_string() });
        client.send(&ControllerEvent::InputFocus {
            surface: SurfaceId(1),
            devices: DeviceClass::KEYBOARD,
            enabled: false,
        });

        let bytes = outbox.take();
        assert!(outbox.is_empty());
        let first = decode_event(&bytes).unwrap();
        assert_eq!(first.object_id, 5);
        assert_eq!(first.message, ControllerEvent::SeatDestroyed { seat: "seat0".to_string() });
        let second = decode_event(&bytes[first.size..]).unwrap();
        assert_eq!(second.message.opcode(), EVT_INPUT_FOCUS);
        assert_eq!(first.size + second.size, bytes.len());
    }

    #[test]
    fn test_oversized_message_leaves_buffer_untouched() {
        let mut out = vec![1, 2, 3];
        let event = ControllerEvent::SeatDestroyed { seat: "s".repeat(70_000) };
        assert!(encode_event(&mut out, 1, &event).is_err());
        assert_eq!(out, vec![1, 2, 3]);
    }
}
