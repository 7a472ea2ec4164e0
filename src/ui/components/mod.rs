pub mod flash_card;
