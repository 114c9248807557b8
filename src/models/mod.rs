/*!
Data structures produced by the BGPmon stream parser.

- [RawFrame]: one complete `<BGP_MONITOR_MESSAGE>` unit cut from the stream
- [BgpEvent]: the routing event interpreted from a frame
*/
mod event;
mod frame;

pub use event::*;
pub use frame::*;
