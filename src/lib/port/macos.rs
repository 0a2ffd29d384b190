// TODO: check for other processes holding the device, e.g. via lsof
pub fn is_port_open(_port_name: &str) -> bool {
    false
}
