use bert::{report, run_measurement, PnGenerator, Settings, SignalLines};

/// A transmitter that sends the PN sequence and corrupts every `error_interval` bit
struct Transmitter {
    sequence: PnGenerator,
    error_interval: u32,
    sent: u32,
    bit: bool,
    clock: bool,
}

impl SignalLines for Transmitter {
    fn clock(&mut self) -> bool {
        self.clock = !self.clock;
        if self.clock {
            self.sent += 1;
            let corrupt = self.sent % self.error_interval == 0;
            self.bit = self.sequence.next().unwrap() ^ corrupt;
        }
        self.clock
    }

    fn data(&mut self) -> bool {
        self.bit
    }
}

fn main() {
    let mut settings = Settings::default();
    println!("{:?}", report::status_lines(&settings).unwrap());

    for _ in 0..3 {
        let transmitter = Transmitter {
            sequence: PnGenerator::new(),
            error_interval: 997,
            sent: 0,
            bit: false,
            clock: false,
        };

        let result = run_measurement(transmitter, &settings.config(), &mut ());
        let lines = report::result_lines(&result).unwrap();
        println!("{}\n{}", lines.top, lines.bottom);

        settings.cycle_length();
    }
}
