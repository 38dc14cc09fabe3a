// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Talk to an Xcom-485i gateway on a serial port.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example gateway --features serial -- /dev/ttyUSB0 0
//! ```

use std::{error::Error, time::Duration};

use xcom485i::{
    AddressOffset, Device,
    client::{
        Client, ClientConfig,
        gateway::{ParameterSource, WriteTarget},
    },
    transport::{BaudRate, SerialConfig, SerialTransport},
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let offset = match args.next() {
        Some(offset) => AddressOffset::try_from(offset.parse::<u8>()?)?,
        None => AddressOffset::Zero,
    };

    let serial = SerialConfig::new().with_baud_rate(BaudRate::B9600);
    let transport = SerialTransport::open(&path, &serial)?;
    let config = ClientConfig::new(offset).with_timeout(Duration::from_secs(1));
    let mut client = Client::new(transport, config);

    let xt1 = Device::Xtender(1);
    for source in [
        ParameterSource::Flash,
        ParameterSource::Minimum,
        ParameterSource::Maximum,
    ] {
        let value = client.read_parameter(xt1, 14, source)?;
        println!("Parameter 14 ({source:?}): {value}");
    }

    let echo = client.write_parameter(xt1, 14, 8.0, WriteTarget::RamOnly)?;
    println!("Registers written: {echo}");

    let info = client.read_info(xt1, 2)?;
    println!("User info 2: {info}");

    let time = client.read_time()?;
    println!(
        "System time: 20{:02}-{:02}-{:02} {:02}:{:02}:{:02}",
        time.year, time.month, time.day, time.hour, time.minute, time.second
    );

    let pending = client.pending_message_count()?;
    println!("Pending messages: {pending}");
    for n in 0..pending {
        let msg = client.read_message()?;
        println!(
            "Message {n}: source = {}, id = {}, value = {}",
            msg.source, msg.id, msg.value
        );
    }
    Ok(())
}
