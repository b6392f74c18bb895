use fivehundred_bot::{BidView, DropView, PlayView, Player, PlayerError};
use fivehundred_core::bid::{Bid, MAX_TRICKS, MIN_TRICKS};
use fivehundred_core::game::outcome::HandResult;
use fivehundred_core::game::round::Contract;
use fivehundred_core::model::card::Card;
use fivehundred_core::model::deck::KITTY_SIZE;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::player::Seat;
use fivehundred_core::model::suit::Suit;
use std::fmt::Write as _;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

const RED: &str = "\x1b[31m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";
const CLEAR: &str = "\x1b[H\x1b[2J";

/// Names of the other seats as seen from the player's own chair.
const RELATIVE_NAMES: [&str; 4] = ["You", "Op1", "Pnr", "Op2"];

enum BidChoice {
    Suit(Suit),
    NoTrumps,
    Misere,
    Pass,
}

/// Terminal player: draws the table after every event and prompts for decisions,
/// re-prompting until the input parses.
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
    seat: Seat,
    hand: Hand,
    table: [Option<Card>; 4],
    contract: Option<Contract>,
    valid: Option<Vec<usize>>,
    clear_screen: bool,
}

impl HumanPlayer<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout()).with_clear_screen(true)
    }
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            seat: Seat::South,
            hand: Hand::new(),
            table: [None; 4],
            contract: None,
            valid: None,
            clear_screen: false,
        }
    }

    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn name(&self, seat: Seat) -> &'static str {
        RELATIVE_NAMES[(seat.index() + 4 - self.seat.index()) % 4]
    }

    fn announce(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
    }

    fn read_line(&mut self) -> Result<String, PlayerError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PlayerError::Closed);
        }
        Ok(line.trim().to_string())
    }

    fn press_to_continue(&mut self) {
        self.announce("[press enter to continue]");
        let _ = self.output.flush();
        let _ = self.read_line();
    }

    fn prompt<T>(
        &mut self,
        text: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> Result<T, PlayerError> {
        loop {
            write!(self.output, "{text}")?;
            self.output.flush()?;
            let line = self.read_line()?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(self.output, "{RED}INVALID: {message}{RESET}")?,
            }
        }
    }

    fn prompt_tricks(&mut self) -> Result<u8, PlayerError> {
        self.prompt(&format!("Tricks [{MIN_TRICKS}-{MAX_TRICKS}]: "), |input| {
            let tricks: u8 = input
                .parse()
                .map_err(|_| format!("expected a number, received {input:?}"))?;
            if (MIN_TRICKS..=MAX_TRICKS).contains(&tricks) {
                Ok(tricks)
            } else {
                Err(format!("invalid # of tricks {input:?}"))
            }
        })
    }

    fn prompt_open_misere(&mut self) -> Result<bool, PlayerError> {
        self.prompt("Open [o] or closed [c]? ", |input| match input {
            "o" => Ok(true),
            "c" => Ok(false),
            other => Err(format!("expected \"o\" or \"c\", received {other:?}")),
        })
    }

    fn redraw(&mut self) {
        let board = self.render();
        if self.clear_screen {
            let _ = write!(self.output, "{CLEAR}");
        }
        let _ = write!(self.output, "{board}");
        let _ = self.output.flush();
    }

    fn render(&self) -> String {
        let seat_at = |offset: usize| self.seat_at(offset);
        let slot = |offset: usize| fmt_card(self.table[seat_at(offset).index()], false);
        let bid = match self.contract {
            Some(contract) => format!("{} by {}", contract.bid, self.name(contract.contractor)),
            None => "-".to_string(),
        };

        let mut board = String::new();
        let _ = writeln!(board, "Bid: {bid}");
        let _ = writeln!(board);
        let _ = writeln!(board, "        {}", RELATIVE_NAMES[2]);
        let _ = writeln!(board, "        {}", slot(2));
        let _ = writeln!(board, "  {}         {}", RELATIVE_NAMES[1], RELATIVE_NAMES[3]);
        let _ = writeln!(board, "  {}         {}", slot(1), slot(3));
        let _ = writeln!(board, "        {}", RELATIVE_NAMES[0]);
        let _ = writeln!(board, "        {}", slot(0));
        let _ = writeln!(board);

        let greyed = |index: usize| {
            self.valid
                .as_ref()
                .is_some_and(|valid| !valid.contains(&index))
        };
        let mut numbers = String::new();
        let mut cards = String::new();
        for (index, &card) in self.hand.iter().enumerate() {
            let number = format!("{index:<4}");
            if greyed(index) {
                let _ = write!(numbers, "{GREY}{number}{RESET}");
            } else {
                numbers.push_str(&number);
            }
            let _ = write!(cards, "{} ", fmt_card(Some(card), greyed(index)));
        }
        let _ = writeln!(board, "{}", numbers.trim_end());
        let _ = writeln!(board, "{}", cards.trim_end());
        let _ = writeln!(board);
        board
    }

    fn seat_at(&self, offset: usize) -> Seat {
        (0..offset).fold(self.seat, |seat, _| seat.next())
    }
}

/// Three characters wide so the table lines up; `[_]` marks an empty slot.
fn fmt_card(card: Option<Card>, grey: bool) -> String {
    match card {
        None => "[_]".to_string(),
        Some(card) if grey => format!("{GREY}{:<3}{RESET}", card.to_string()),
        Some(card) => format!("{:<3}", card.to_string()),
    }
}

fn parse_drop(input: &str, len: usize) -> Result<Vec<usize>, String> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != KITTY_SIZE {
        return Err(format!("expected {KITTY_SIZE} nums, received {}", parts.len()));
    }
    let mut indices = Vec::with_capacity(KITTY_SIZE);
    for part in parts {
        let index: usize = part
            .parse()
            .map_err(|_| format!("{part:?} is not a number"))?;
        if index >= len {
            return Err(format!("{index} is out of range"));
        }
        if indices.contains(&index) {
            return Err(format!("repeated numbers in {input}"));
        }
        indices.push(index);
    }
    Ok(indices)
}

impl<R: BufRead + Send, W: Write + Send> Player for HumanPlayer<R, W> {
    fn notify_seat(&mut self, seat: Seat) {
        self.seat = seat;
        self.table = [None; 4];
        self.contract = None;
    }

    fn notify_hand(&mut self, hand: &Hand) {
        self.hand = hand.clone();
        self.redraw();
    }

    fn notify_bid(&mut self, seat: Seat, bid: Bid) {
        let name = self.name(seat);
        if bid.is_pass() {
            self.announce(&format!("{name} passed"));
        } else {
            self.announce(&format!("{name} bid {bid}"));
        }
    }

    fn notify_bid_winner(&mut self, contractor: Seat, bid: Bid) {
        self.contract = Some(Contract { bid, contractor });
        let name = self.name(contractor);
        self.announce(&format!("{name} won the bidding with {bid}"));
        self.press_to_continue();
    }

    fn notify_play(&mut self, seat: Seat, card: Card) {
        self.table[seat.index()] = Some(card);
        self.redraw();
    }

    fn notify_trick_winner(&mut self, winner: Seat) {
        let name = self.name(winner);
        self.announce(&format!("{name} won the trick"));
        self.press_to_continue();
        self.table = [None; 4];
        self.redraw();
    }

    fn notify_hand_result(&mut self, result: &HandResult) {
        self.announce(&result.to_string());
    }

    fn bid(&mut self, view: &BidView) -> Result<Bid, PlayerError> {
        if let Some(current) = view.current {
            let name = self.name(current.seat);
            self.announce(&format!("Current bid: {} by {name}", current.bid));
        }
        loop {
            let choice = self.prompt("Enter bid [s/c/d/h/n/m/p]: ", |input| match input {
                "n" => Ok(BidChoice::NoTrumps),
                "m" => Ok(BidChoice::Misere),
                "p" => Ok(BidChoice::Pass),
                "s" | "c" | "d" | "h" => Suit::from_letter(input)
                    .map(BidChoice::Suit)
                    .ok_or_else(|| format!("unknown bid {input:?}")),
                other => Err(format!("unknown bid {other:?}")),
            })?;
            let bid = match choice {
                BidChoice::Suit(trump) => Bid::suit(self.prompt_tricks()?, trump),
                BidChoice::NoTrumps => Bid::no_trumps(self.prompt_tricks()?),
                BidChoice::Misere => Bid::misere(self.prompt_open_misere()?),
                BidChoice::Pass => Bid::Pass,
            };
            let current = view.current.map(|record| record.bid);
            if bid.is_pass() || bid.outbids(current) {
                return Ok(bid);
            }
            let current = current.map_or_else(|| "-".to_string(), |bid| bid.to_string());
            writeln!(
                self.output,
                "{RED}INVALID: {bid} does not outbid {current}{RESET}"
            )?;
        }
    }

    fn drop3(&mut self, view: &DropView) -> Result<Vec<usize>, PlayerError> {
        self.hand = view.hand.clone();
        self.redraw();
        let len = self.hand.len();
        self.prompt("Cards to dump [x,y,z]: ", |input| parse_drop(input, len))
    }

    fn play(&mut self, view: &PlayView) -> Result<usize, PlayerError> {
        self.hand = view.hand.clone();
        self.valid = Some(view.valid.to_vec());
        self.redraw();
        let valid = view.valid;
        let chosen = self.prompt("play card: ", |input| {
            let index: usize = input
                .parse()
                .map_err(|_| format!("{input:?} is not a number"))?;
            if valid.contains(&index) {
                Ok(index)
            } else {
                Err("invalid play".to_string())
            }
        });
        self.valid = None;
        chosen
    }

    fn joker_suit(&mut self, _hand: &Hand) -> Result<Suit, PlayerError> {
        self.prompt("Choose suit for Joker [s/c/d/h]: ", |input| match input {
            "s" | "c" | "d" | "h" => {
                Suit::from_letter(input).ok_or_else(|| format!("unknown suit {input:?}"))
            }
            other => Err(format!("unknown suit {other:?}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HumanPlayer;
    use fivehundred_bot::{BidView, DropView, PlayView, Player, PlayerError};
    use fivehundred_core::bid::Bid;
    use fivehundred_core::game::auction::BidRecord;
    use fivehundred_core::game::round::Contract;
    use fivehundred_core::model::card::Card;
    use fivehundred_core::model::deck::Deck;
    use fivehundred_core::model::hand::Hand;
    use fivehundred_core::model::player::Seat;
    use fivehundred_core::model::rank::Rank;
    use fivehundred_core::model::suit::Suit;
    use fivehundred_core::model::trick::Trick;
    use std::io::Cursor;

    fn player(input: &str) -> HumanPlayer<Cursor<Vec<u8>>, Vec<u8>> {
        HumanPlayer::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(player: HumanPlayer<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(player.into_output()).expect("utf8")
    }

    fn hand_of(len: usize) -> Hand {
        Hand::with_cards(Deck::five_hundred().cards()[..len].to_vec())
    }

    fn bid_view<'a>(hand: &'a Hand, current: Option<BidRecord>) -> BidView<'a> {
        BidView {
            seat: Seat::South,
            hand,
            current,
            history: &[],
        }
    }

    #[test]
    fn bid_reprompts_until_valid() {
        let hand = hand_of(10);
        let mut human = player("x\nh\n11\n7\n");
        let bid = human.bid(&bid_view(&hand, None)).expect("bid");
        assert_eq!(bid, Bid::suit(7, Suit::Hearts));
        let text = output(human);
        assert_eq!(text.matches("INVALID").count(), 2);
        assert!(text.contains("Tricks [6-10]: "));
    }

    #[test]
    fn bid_covers_misere_and_pass() {
        let hand = hand_of(10);
        let mut human = player("m\nq\no\n");
        assert_eq!(
            human.bid(&bid_view(&hand, None)).expect("bid"),
            Bid::misere(true)
        );

        let mut human = player("p\n");
        assert_eq!(human.bid(&bid_view(&hand, None)).expect("bid"), Bid::Pass);
    }

    #[test]
    fn bid_must_outbid_the_current_bid() {
        let hand = hand_of(10);
        let current = BidRecord {
            seat: Seat::West,
            bid: Bid::suit(7, Suit::Diamonds),
        };
        let mut human = player("s\n7\nn\n8\n");
        let bid = human.bid(&bid_view(&hand, Some(current))).expect("bid");
        assert_eq!(bid, Bid::no_trumps(8));
        let text = output(human);
        assert!(text.contains("Current bid: 7♦ by Op1"));
        assert!(text.contains("does not outbid"));
    }

    #[test]
    fn drop_needs_three_distinct_indices_in_range() {
        let hand = hand_of(13);
        let mut human = player("1,2\n1,1,2\n0,1,13\n0, 12 ,2\n");
        let view = DropView {
            seat: Seat::South,
            hand: &hand,
            rules: Bid::suit(6, Suit::Hearts).rules(),
        };
        assert_eq!(human.drop3(&view).expect("drop"), vec![0, 12, 2]);
        assert_eq!(output(human).matches("INVALID").count(), 3);
    }

    #[test]
    fn play_accepts_only_valid_indices() {
        let hand = hand_of(10);
        let trick = Trick::new(Seat::West);
        let bid = Bid::no_trumps(6);
        let view = PlayView {
            seat: Seat::South,
            hand: &hand,
            trick: &trick,
            valid: &[2, 5],
            rules: bid.rules(),
            contract: Contract {
                bid,
                contractor: Seat::West,
            },
        };
        let mut human = player("zero\n0\n5\n");
        assert_eq!(human.play(&view).expect("play"), 5);
        let text = output(human);
        assert!(text.contains("invalid play"));
        assert!(text.contains("Bid: -"));
    }

    #[test]
    fn joker_suit_prompt() {
        let mut human = player("z\nd\n");
        assert_eq!(
            human.joker_suit(&Hand::new()).expect("suit"),
            Suit::Diamonds
        );
    }

    #[test]
    fn closed_input_ends_the_request() {
        let hand = hand_of(10);
        let mut human = player("");
        assert!(matches!(
            human.bid(&bid_view(&hand, None)),
            Err(PlayerError::Closed)
        ));
    }

    #[test]
    fn board_names_seats_relative_to_the_player() {
        let mut human = player("\n");
        human.notify_seat(Seat::West);
        human.notify_bid(Seat::East, Bid::Pass);
        human.notify_bid(Seat::South, Bid::no_trumps(6));
        human.notify_play(Seat::East, Card::new(Rank::Ten, Suit::Hearts));
        human.notify_trick_winner(Seat::North);
        let text = output(human);
        assert!(text.contains("Pnr passed"));
        assert!(text.contains("Op2 bid 6NT"));
        assert!(text.contains("10♥"));
        assert!(text.contains("Op1 won the trick"));
    }
}
