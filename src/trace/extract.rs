use anyhow::{anyhow, Result};
use futures::{stream, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::wrappers::LinesStream;
use tracing::{instrument, trace};

use super::sample::{IdleInterval, Sample};

/// Turns a line-oriented reader into a stream of parsed samples. Parse
/// failures surface as stream items so the consumer decides when to stop.
pub fn read_samples<R>(reader: R) -> impl Stream<Item = Result<Sample>>
where
    R: AsyncBufRead + Unpin,
{
    LinesStream::new(reader.lines()).map(|line| -> Result<Sample> { Ok(line?.parse()?) })
}

enum ScanState<S> {
    Leading(S),
    Scanning(S, Sample),
    Drained,
}

/// Collapses a sample stream into the idle intervals it describes.
///
/// The counter accumulates while the machine stays idle, so a drop between
/// two consecutive samples means the previous idle run ended. Each drop emits
/// the interval that just closed, and the last sample always closes one more.
/// Equal consecutive values are a continuation, never a reset.
///
/// An input without a single sample is an error. There is nothing meaningful
/// to emit and silently printing nothing would hide a broken upstream.
#[instrument(skip(samples))]
pub fn idle_intervals<S>(samples: S) -> impl Stream<Item = Result<IdleInterval>>
where
    S: Stream<Item = Result<Sample>>,
{
    stream::try_unfold(ScanState::Leading(Box::pin(samples)), |state| async move {
        let (mut samples, mut previous) = match state {
            ScanState::Leading(mut samples) => {
                let first = samples
                    .next()
                    .await
                    .transpose()?
                    .ok_or_else(|| anyhow!("Empty trace: expected at least one sample"))?;
                (samples, first)
            }
            ScanState::Scanning(samples, previous) => (samples, previous),
            ScanState::Drained => return Ok(None),
        };

        while let Some(sample) = samples.next().await.transpose()? {
            if sample.idleness < previous.idleness {
                trace!(
                    "Reset at {}: {} -> {}",
                    sample.timestamp,
                    previous.idleness,
                    sample.idleness
                );
                let interval = IdleInterval::ending_at(&previous);
                return Ok(Some((interval, ScanState::Scanning(samples, sample))));
            }
            previous = sample;
        }

        // End of input. The last sample still closes an open idle run.
        Ok(Some((IdleInterval::ending_at(&previous), ScanState::Drained)))
    })
}
